pub mod clipboard;
pub mod logging;
pub mod random;
#[cfg(test)]
pub mod test_utils;
pub mod url;
