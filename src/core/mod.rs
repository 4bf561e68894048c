pub mod hash;
pub mod prg;
pub mod prp;
pub mod rng;

#[cfg(test)]
mod tests;
