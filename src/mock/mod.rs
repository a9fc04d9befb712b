pub mod model;
pub mod store;

pub use model::{HttpMethod, MockEndpoint, MockInput, MockPatch};
pub use store::MockStore;
