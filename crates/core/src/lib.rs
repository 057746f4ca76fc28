pub mod audio;
pub mod censoring;
pub mod pipeline;
pub mod shared;
pub mod transcription;
