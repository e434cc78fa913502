/// Fixed-width byte string rendered as `0x`-prefixed lowercase hex.
macro_rules! hex_bytes_newtype {
    ($name:ident, $len:expr) => {
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub [u8; $len]);

        impl $name {
            pub const LEN: usize = $len;

            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self([0u8; $len])
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({self})", stringify!($name))
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::HexParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let digits = s
                    .trim()
                    .strip_prefix("0x")
                    .or_else(|| s.trim().strip_prefix("0X"))
                    .unwrap_or(s.trim());
                if digits.len() != $len * 2 {
                    return Err($crate::error::HexParseError::Length {
                        expected: $len * 2,
                        actual: digits.len(),
                    });
                }
                let mut out = [0u8; $len];
                hex::decode_to_slice(digits, &mut out)
                    .map_err(|err| $crate::error::HexParseError::Digits(err.to_string()))?;
                Ok(Self(out))
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

pub mod domain;
pub mod error;
pub mod protocol;
