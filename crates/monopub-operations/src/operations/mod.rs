mod changed;
pub mod publish;

pub use changed::{ChangedInput, ChangedOperation, ChangedOutput};
pub use publish::{PublishInput, PublishOperation};
