//! Hardware capability probe.
//!
//! The accelerated matrix kernel needs two architecturally unrelated
//! extensions at once, and on Linux/Android they are advertised in two
//! different auxiliary-vector words. Each requirement is therefore a
//! `(register, mask)` pair rather than one combined bit pattern.
//!
//! ```text
//! Target   Register 0            Register 1               Required pair
//! ───────  ────────────────────  ───────────────────────  ─────────────────
//! aarch64  AT_HWCAP              AT_HWCAP2                SVE (0, 1 << 22)
//!                                                         I8MM (1, 1 << 13)
//! x86_64   CPUID.1:ECX           CPUID.(7,0):EBX          AVX (0, 1 << 28)
//!                                                         AVX2 (1, 1 << 5)
//! other    -                     -                        always unsupported
//! ```
//!
//! x86_64 has no exact counterpart of the SVE + I8MM pair in stable Rust;
//! its int8 dot-product family proper is AVX-512 VNNI. AVX2 stands in for
//! it: the kernel sign-extends to i16 and uses the pairwise multiply-add
//! (`VPMADDWD`), which gives the same exact int32 results on far more
//! machines.
//!
//! The probe only proves eligibility. The vector width is queried by the
//! kernel itself, since it varies between CPU models implementing the same
//! extension.

use serde::{Deserialize, Serialize};

/// Whether the build target has an accelerated kernel at all.
pub const ACCELERATED_ISA: bool = cfg!(any(target_arch = "aarch64", target_arch = "x86_64"));

/// Index of a feature-advertisement register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Register {
    /// First word (`AT_HWCAP` on Linux).
    Hwcap = 0,
    /// Extension word (`AT_HWCAP2` on Linux).
    Hwcap2 = 1,
}

/// One required feature: a bit mask tested against one register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureMask {
    pub register: Register,
    pub bits: u64,
}

impl FeatureMask {
    pub const fn new(register: Register, bits: u64) -> Self {
        Self { register, bits }
    }

    /// A mask that never matches.
    pub const EMPTY: Self = Self::new(Register::Hwcap, 0);

    /// Scalable Vector Extension (`HWCAP_SVE`).
    #[cfg(target_arch = "aarch64")]
    pub const SVE: Self = Self::new(Register::Hwcap, 1 << 22);

    /// Int8 matrix multiply (`HWCAP2_I8MM`).
    #[cfg(target_arch = "aarch64")]
    pub const I8MM: Self = Self::new(Register::Hwcap2, 1 << 13);

    /// AVX (`CPUID.1:ECX[28]`).
    #[cfg(target_arch = "x86_64")]
    pub const AVX: Self = Self::new(Register::Hwcap, 1 << 28);

    /// AVX2 (`CPUID.(7,0):EBX[5]`).
    #[cfg(target_arch = "x86_64")]
    pub const AVX2: Self = Self::new(Register::Hwcap2, 1 << 5);

    /// The pair the accelerated kernel requires on this target.
    #[cfg(target_arch = "aarch64")]
    pub const ACCELERATED: [Self; 2] = [Self::SVE, Self::I8MM];

    #[cfg(target_arch = "x86_64")]
    pub const ACCELERATED: [Self; 2] = [Self::AVX, Self::AVX2];

    #[cfg(not(any(target_arch = "aarch64", target_arch = "x86_64")))]
    pub const ACCELERATED: [Self; 2] = [Self::EMPTY, Self::EMPTY];
}

/// Raw values of the two feature-advertisement registers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureRegisters {
    pub hwcap: u64,
    pub hwcap2: u64,
}

impl FeatureRegisters {
    pub const fn new(hwcap: u64, hwcap2: u64) -> Self {
        Self { hwcap, hwcap2 }
    }

    /// Read both registers from the running CPU / OS.
    pub fn read() -> Self {
        read_registers()
    }

    pub fn get(&self, register: Register) -> u64 {
        match register {
            Register::Hwcap => self.hwcap,
            Register::Hwcap2 => self.hwcap2,
        }
    }

    /// True when any bit of `mask` is set in its register.
    pub fn is_set(&self, mask: FeatureMask) -> bool {
        self.get(mask.register) & mask.bits != 0
    }
}

#[cfg(all(target_arch = "aarch64", any(target_os = "linux", target_os = "android")))]
fn read_registers() -> FeatureRegisters {
    // SAFETY: getauxval has no preconditions; unknown entries read as 0.
    let (hwcap, hwcap2) = unsafe {
        (
            libc::getauxval(libc::AT_HWCAP),
            libc::getauxval(libc::AT_HWCAP2),
        )
    };
    FeatureRegisters::new(hwcap as u64, hwcap2 as u64)
}

#[cfg(all(target_arch = "aarch64", not(any(target_os = "linux", target_os = "android"))))]
fn read_registers() -> FeatureRegisters {
    // No auxiliary vector here: rebuild the two words from the OS feature query.
    let mut registers = FeatureRegisters::default();
    if std::arch::is_aarch64_feature_detected!("sve") {
        registers.hwcap |= FeatureMask::SVE.bits;
    }
    if std::arch::is_aarch64_feature_detected!("i8mm") {
        registers.hwcap2 |= FeatureMask::I8MM.bits;
    }
    registers
}

#[cfg(target_arch = "x86_64")]
fn read_registers() -> FeatureRegisters {
    use std::arch::x86_64::{__cpuid, __cpuid_count};

    // SAFETY: CPUID is available on every x86_64 CPU; leaf 7 is only read
    // when the highest supported leaf covers it.
    #[allow(unused_unsafe)]
    let (ecx1, ebx7) = unsafe {
        let max_leaf = __cpuid(0).eax;
        let ebx7 = if max_leaf >= 7 {
            __cpuid_count(7, 0).ebx
        } else {
            0
        };
        (__cpuid(1).ecx, ebx7)
    };

    let mut registers = FeatureRegisters::new(u64::from(ecx1), u64::from(ebx7));

    // CPUID reports what the silicon implements; the YMM state must also be
    // enabled by the OS before AVX instructions are usable.
    if !std::arch::is_x86_feature_detected!("avx") {
        registers.hwcap &= !FeatureMask::AVX.bits;
    }
    if !std::arch::is_x86_feature_detected!("avx2") {
        registers.hwcap2 &= !FeatureMask::AVX2.bits;
    }
    registers
}

#[cfg(not(any(target_arch = "aarch64", target_arch = "x86_64")))]
fn read_registers() -> FeatureRegisters {
    FeatureRegisters::default()
}

/// Immutable capability descriptor, established once per benchmark session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Capabilities {
    accelerated: bool,
}

impl Capabilities {
    /// Descriptor that always selects the scalar path.
    pub const fn unsupported() -> Self {
        Self { accelerated: false }
    }

    /// Build the descriptor from host-supplied registers.
    ///
    /// Both masks must match. On targets without an accelerated kernel the
    /// registers are not consulted.
    pub fn from_registers(
        registers: &FeatureRegisters,
        primary: FeatureMask,
        secondary: FeatureMask,
    ) -> Self {
        if !ACCELERATED_ISA {
            return Self::unsupported();
        }

        Self {
            accelerated: registers.is_set(primary) && registers.is_set(secondary),
        }
    }

    /// Build the descriptor with this target's required feature pair.
    pub fn from_target_registers(registers: &FeatureRegisters) -> Self {
        let [primary, secondary] = FeatureMask::ACCELERATED;
        Self::from_registers(registers, primary, secondary)
    }

    /// Does the CPU support the wide int8 dot-product family?
    pub fn accelerated(&self) -> bool {
        self.accelerated
    }
}

/// Read the hardware registers and derive the capability descriptor.
pub fn probe() -> Capabilities {
    let registers = FeatureRegisters::read();
    let capabilities = Capabilities::from_target_registers(&registers);

    tracing::debug!(
        hwcap = registers.hwcap,
        hwcap2 = registers.hwcap2,
        accelerated = capabilities.accelerated(),
        "probed cpu features"
    );

    capabilities
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn test_x86_pair_is_avx_then_avx2() {
        assert_eq!([FeatureMask::AVX, FeatureMask::AVX2], FeatureMask::ACCELERATED);
        assert_eq!(Register::Hwcap, FeatureMask::AVX.register);
        assert_eq!(Register::Hwcap2, FeatureMask::AVX2.register);

        // The stand-in must agree with what the kernel itself detects.
        let registers = FeatureRegisters::read();
        assert_eq!(
            registers.is_set(FeatureMask::AVX2),
            std::arch::is_x86_feature_detected!("avx2")
        );
    }

    #[cfg(target_arch = "aarch64")]
    #[test]
    fn test_aarch64_pair_is_sve_then_i8mm() {
        assert_eq!([FeatureMask::SVE, FeatureMask::I8MM], FeatureMask::ACCELERATED);
        assert_eq!(1 << 22, FeatureMask::SVE.bits);
        assert_eq!(1 << 13, FeatureMask::I8MM.bits);
    }

    #[test]
    fn test_mask_reads_its_own_register() {
        let registers = FeatureRegisters::new(0b0100, 0b1000);

        assert!(registers.is_set(FeatureMask::new(Register::Hwcap, 0b0100)));
        assert!(!registers.is_set(FeatureMask::new(Register::Hwcap2, 0b0100)));
        assert!(registers.is_set(FeatureMask::new(Register::Hwcap2, 0b1000)));
        assert!(!registers.is_set(FeatureMask::EMPTY));
    }

    #[test]
    fn test_both_features_required() {
        let primary = FeatureMask::new(Register::Hwcap, 1 << 3);
        let secondary = FeatureMask::new(Register::Hwcap2, 1 << 7);

        let both = FeatureRegisters::new(1 << 3, 1 << 7);
        let only_primary = FeatureRegisters::new(1 << 3, 0);
        let only_secondary = FeatureRegisters::new(0, 1 << 7);
        // Right bits, wrong words.
        let swapped = FeatureRegisters::new(1 << 7, 1 << 3);

        assert_eq!(
            Capabilities::from_registers(&both, primary, secondary).accelerated(),
            ACCELERATED_ISA
        );
        assert!(!Capabilities::from_registers(&only_primary, primary, secondary).accelerated());
        assert!(!Capabilities::from_registers(&only_secondary, primary, secondary).accelerated());
        assert!(!Capabilities::from_registers(&swapped, primary, secondary).accelerated());
    }

    #[test]
    fn test_all_bits_set_follows_target() {
        let registers = FeatureRegisters::new(u64::MAX, u64::MAX);
        let capabilities = Capabilities::from_target_registers(&registers);

        assert_eq!(capabilities.accelerated(), ACCELERATED_ISA);
    }

    #[cfg(not(any(target_arch = "aarch64", target_arch = "x86_64")))]
    #[test]
    fn test_unsupported_target_ignores_registers() {
        let registers = FeatureRegisters::new(u64::MAX, u64::MAX);
        let any = FeatureMask::new(Register::Hwcap, 1);

        assert!(!Capabilities::from_registers(&registers, any, any).accelerated());
        assert!(!probe().accelerated());
    }

    #[test]
    fn test_probe_is_stable() {
        assert_eq!(probe(), probe());
    }

    #[test]
    fn test_unsupported_is_default() {
        assert_eq!(Capabilities::default(), Capabilities::unsupported());
        assert!(!Capabilities::unsupported().accelerated());
    }
}
