//! Query answering: lexical filter → embeddings → ranking → context
//! assembly → completion.

pub mod answer;
pub mod assemble;
pub mod gate;
pub mod lexical;
pub mod rank;

pub use answer::{Answer, Outcome, Pipeline, Source};
pub use gate::SingleFlight;
