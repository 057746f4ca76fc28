pub mod lexicon_classifier;
