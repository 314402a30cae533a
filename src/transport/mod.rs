mod local;

pub use local::LocalTransport;
