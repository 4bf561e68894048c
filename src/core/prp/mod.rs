use generic_array::{ArrayLength, GenericArray};

pub mod bash_f;

/// Pseudo-random permutation.
///
/// Actually, it may be non-bijective as the inverse transform is not used in sponge construction.
#[allow(clippy::upper_case_acronyms)]
pub trait PRP {
    /// Size of the full state in bytes.
    /// Rate and capacity are not fixed by the permutation, the automaton on top decides them.
    type StateSize: ArrayLength<u8>;

    /// Transform full state.
    fn transform(&mut self);

    /// Ref for ejecting state bytes.
    fn state(&self) -> &GenericArray<u8, Self::StateSize>;

    /// Mut ref for injecting state bytes.
    fn state_mut(&mut self) -> &mut GenericArray<u8, Self::StateSize>;
}
