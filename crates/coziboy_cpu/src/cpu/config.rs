use typed_builder::TypedBuilder;

/// Behaviour switches for a [`Cpu`](super::Cpu).
///
/// ```
/// use coziboy_cpu::cpu::CpuConfig;
///
/// let config = CpuConfig::builder().strict_opcodes(false).build();
/// assert!(!config.strict_opcodes);
/// assert!(config.halt_bug);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, TypedBuilder)]
pub struct CpuConfig {
    /// When set, fetching an opcode hole returns `CpuError::InvalidOpcode`
    /// and locks the core. When clear, the hole is logged and skipped as a
    /// 4-cycle no-op.
    #[builder(default = true)]
    pub strict_opcodes: bool,

    /// Reproduce the HALT bug (HALT with IME clear and an interrupt already
    /// pending does not halt and the next opcode byte is fetched twice).
    #[builder(default = true)]
    pub halt_bug: bool,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
