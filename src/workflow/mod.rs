pub mod announce;
pub mod collect;

#[cfg(test)]
pub(crate) mod testing;
