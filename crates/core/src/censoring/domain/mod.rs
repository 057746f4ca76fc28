pub mod audio_excisor;
pub mod excision_interval;
pub mod profanity_classifier;
pub mod scored_word;
pub mod segment_scorer;
pub mod timeline_merger;
