pub mod analyzers;
pub mod errors;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod post;
pub mod services;
pub mod tokenizer;
