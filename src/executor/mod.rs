mod write_queue;


pub use write_queue::*;
