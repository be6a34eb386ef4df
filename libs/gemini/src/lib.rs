pub mod models;

pub use models::{
    text_generation::{
        GenerateContentRequest, GenerateContentResponse, TextGeneration,
    },
    Models,
};
