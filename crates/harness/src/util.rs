//! Thin wrappers over host facilities that tests reach for directly.

/// Host side that owns the lifetime of its values.
pub trait ValueRelease {
    /// Host value type.
    type Value;

    /// Releases `value`.
    fn free_var(&mut self, value: Self::Value);
}

/// Releases `value` through `host`.
pub fn free_var<H: ValueRelease + ?Sized>(host: &mut H, value: H::Value) {
    host.free_var(value);
}

/// A compiled program with a main bytecode vector.
pub trait CompiledProgram {
    /// Returns the main vector's bytecode.
    fn main_vector(&self) -> &[u8];
}

/// Returns the size of the program's main vector in bytes.
///
/// Zero when there is no program; saturates at `u32::MAX`.
#[must_use]
pub fn program_bytecode_size<P: CompiledProgram + ?Sized>(program: Option<&P>) -> u32 {
    program.map_or(0, |program| {
        u32::try_from(program.main_vector().len()).unwrap_or(u32::MAX)
    })
}
