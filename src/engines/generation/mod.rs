pub mod random_algorithm;

pub use random_algorithm::RandomAlgorithmGenerator;
