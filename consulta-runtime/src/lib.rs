pub mod export;
pub mod gateway;
pub mod llm;
pub mod stt;
