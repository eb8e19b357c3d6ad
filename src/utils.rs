pub mod logs;
#[cfg(test)]
pub(crate) mod testing;
