pub mod logging;
pub use logging::{FileLogger, StdoutLogger, init_file_logger, init_stdout_logger};

mod timestamp;
pub use timestamp::*;

mod vec2;
pub use vec2::*;

pub use log;
