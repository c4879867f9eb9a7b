mod editor;
mod notification;
mod preferences;

#[cfg(test)]
mod preferences_test;

pub use editor::*;
pub use notification::*;
pub use preferences::*;
