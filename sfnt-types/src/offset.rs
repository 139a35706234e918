//! Offsets to tables

macro_rules! impl_offset {
    ($name:ident, $bits:literal, $rawty:ty) => {
        #[doc = concat!("A ", stringify!($bits), "-bit offset to a subtable.")]
        ///
        /// Offsets are measured from the start of the structure that holds
        /// them. Zero is the null offset, which many fields use to mean
        /// 'absent'.
        #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name($rawty);

        impl $name {
            pub const fn new(raw: $rawty) -> Self {
                Self(raw)
            }

            /// `true` for the null (zero) offset.
            pub const fn is_null(self) -> bool {
                self.0 == 0
            }

            /// The offset, widened to 32 bits.
            pub const fn to_u32(self) -> u32 {
                self.0 as u32
            }
        }

        crate::newtype_scalar!($name, [u8; $bits / 8]);
    };
}

impl_offset!(Offset16, 16, u16);
impl_offset!(Offset32, 32, u32);
