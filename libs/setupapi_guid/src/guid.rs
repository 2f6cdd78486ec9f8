// Copyright (c) ScaleFS LLC; used with permission
// Licensed under the MIT License

use std::str::FromStr;

// NOTE: the field layout matches the native GUID structure (and SP_DEVINFO_DATA.ClassGuid); data4 holds the final two hyphen-separated groups as one 8-octet sequence
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Guid {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}
impl Guid {
    pub const fn from_values(data1: u32, data2: u16, data3: u16, data4: [u8; 8]) -> Self {
        Self { data1, data2, data3, data4 }
    }

    pub const fn from_u128(guid_as_u128: u128) -> Self {
        Self {
            data1: (guid_as_u128 >> 96) as u32,
            data2: (guid_as_u128 >> 80) as u16,
            data3: (guid_as_u128 >> 64) as u16,
            data4: (guid_as_u128 as u64).to_be_bytes(),
        }
    }

    pub const fn as_u128(&self) -> u128 {
        ((self.data1 as u128) << 96) |
        ((self.data2 as u128) << 80) |
        ((self.data3 as u128) << 64) |
        (u64::from_be_bytes(self.data4) as u128)
    }

    pub const fn is_nil(&self) -> bool {
        self.as_u128() == 0
    }
}

//

#[cfg(target_os = "windows")]
impl From<windows::core::GUID> for Guid {
    fn from(value: windows::core::GUID) -> Self {
        Self {
            data1: value.data1,
            data2: value.data2,
            data3: value.data3,
            data4: value.data4,
        }
    }
}

#[cfg(target_os = "windows")]
impl From<Guid> for windows::core::GUID {
    fn from(value: Guid) -> Self {
        Self {
            data1: value.data1,
            data2: value.data2,
            data3: value.data3,
            data4: value.data4,
        }
    }
}

#[cfg(target_os = "windows")]
impl From<windows_sys::core::GUID> for Guid {
    fn from(value: windows_sys::core::GUID) -> Self {
        Self {
            data1: value.data1,
            data2: value.data2,
            data3: value.data3,
            data4: value.data4,
        }
    }
}

#[cfg(target_os = "windows")]
impl From<Guid> for windows_sys::core::GUID {
    fn from(value: Guid) -> Self {
        Self {
            data1: value.data1,
            data2: value.data2,
            data3: value.data3,
            data4: value.data4,
        }
    }
}

//

// registry-style rendering: braces, upper-case hex, data1 always zero-padded to eight digits
impl std::fmt::Display for Guid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{{:08X}-{:04X}-{:04X}-{:02X}{:02X}-{:02X}{:02X}{:02X}{:02X}{:02X}{:02X}}}",
            self.data1,
            self.data2,
            self.data3,
            self.data4[0], self.data4[1],
            self.data4[2], self.data4[3], self.data4[4], self.data4[5], self.data4[6], self.data4[7],
        )
    }
}

//

#[derive(Debug, PartialEq, Eq)]
pub struct ParseGuidError;

impl std::fmt::Display for ParseGuidError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("invalid GUID string")
    }
}

impl std::error::Error for ParseGuidError {}

impl FromStr for Guid {
    type Err = ParseGuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // if present, remove leading and trailing curly braces (a leading brace must be matched by a trailing one)
        let unbraced = match s.strip_prefix('{') {
            Some(rest) => rest.strip_suffix('}').ok_or(ParseGuidError)?,
            None => s,
        };

        let mut chars = unbraced.chars().collect::<Vec<char>>();

        let capture_leading_hex_digits = |chars: &mut Vec<char>, hex_digit_len: usize| -> Result<u32, ParseGuidError> {
            if chars.len() < hex_digit_len { return Err(ParseGuidError); } // not enough content
            if !chars[0..hex_digit_len].iter().all(|ch| ch.is_ascii_hexdigit()) {
                // NOTE: from_str_radix alone would accept a leading '+'
                return Err(ParseGuidError);
            }
            let digits = chars.drain(0..hex_digit_len).collect::<String>();
            u32::from_str_radix(&digits, 16).map_err(|_| ParseGuidError)
        };

        let remove_leading_hyphen = |chars: &mut Vec<char>| -> Result<(), ParseGuidError> {
            if chars.first() != Some(&'-') {
                return Err(ParseGuidError);
            }
            _ = chars.remove(0);
            Ok(())
        };

        let data1 = capture_leading_hex_digits(&mut chars, 8)?;
        remove_leading_hyphen(&mut chars)?;
        let data2 = capture_leading_hex_digits(&mut chars, 4)? as u16;
        remove_leading_hyphen(&mut chars)?;
        let data3 = capture_leading_hex_digits(&mut chars, 4)? as u16;
        remove_leading_hyphen(&mut chars)?;

        let mut data4 = [0u8; 8];
        for (index, octet) in data4.iter_mut().enumerate() {
            // the hyphen that breaks up the 2 and 6 octets of data4
            if index == 2 {
                remove_leading_hyphen(&mut chars)?;
            }
            *octet = capture_leading_hex_digits(&mut chars, 2)? as u8;
        }

        if !chars.is_empty() {
            // all chars should have been consumed at this point
            return Err(ParseGuidError);
        }

        Ok(Self {
            data1,
            data2,
            data3,
            data4,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // GUID_DEVCLASS_PROCESSOR
    const PROCESSOR_CLASS: Guid = Guid::from_u128(0x50127dc3_0f36_415e_a6cc_4cb3be910b65);

    #[test]
    fn display_uses_braced_upper_case_form() {
        assert_eq!(PROCESSOR_CLASS.to_string(), "{50127DC3-0F36-415E-A6CC-4CB3BE910B65}");
    }

    #[test]
    fn display_pads_data1_to_eight_digits() {
        let guid = Guid::from_values(0x1, 0x2, 0x3, [0, 0, 0, 0, 0, 0, 0, 0x4]);
        assert_eq!(guid.to_string(), "{00000001-0002-0003-0000-000000000004}");
    }

    #[test]
    fn parses_with_and_without_braces() {
        let braced: Guid = "{50127dc3-0f36-415e-a6cc-4cb3be910b65}".parse().unwrap();
        let bare: Guid = "50127DC3-0F36-415E-A6CC-4CB3BE910B65".parse().unwrap();
        assert_eq!(braced, PROCESSOR_CLASS);
        assert_eq!(bare, PROCESSOR_CLASS);
    }

    #[test]
    fn parses_its_own_rendering() {
        let rendered = PROCESSOR_CLASS.to_string();
        assert_eq!(rendered.parse::<Guid>(), Ok(PROCESSOR_CLASS));
    }

    #[test]
    fn rejects_malformed_strings() {
        for input in [
            "",
            "{",
            "{}",
            "{50127dc3-0f36-415e-a6cc-4cb3be910b65",
            "50127dc3-0f36-415e-a6cc-4cb3be910b65}",
            "50127dc3-0f36-415e-a6cc4cb3be910b65",
            "50127dc3-0f36-415e-a6cc-4cb3be910b6",
            "50127dc3-0f36-415e-a6cc-4cb3be910b655",
            "+0127dc3-0f36-415e-a6cc-4cb3be910b65",
            "50127dc3-0f36-415e-a6cc-4cb3be910g65",
        ] {
            assert_eq!(input.parse::<Guid>(), Err(ParseGuidError), "input: {input:?}");
        }
    }

    #[test]
    fn u128_conversion_keeps_field_order() {
        assert_eq!(PROCESSOR_CLASS.data1, 0x50127dc3);
        assert_eq!(PROCESSOR_CLASS.data2, 0x0f36);
        assert_eq!(PROCESSOR_CLASS.data3, 0x415e);
        assert_eq!(PROCESSOR_CLASS.data4, [0xa6, 0xcc, 0x4c, 0xb3, 0xbe, 0x91, 0x0b, 0x65]);
        assert_eq!(PROCESSOR_CLASS.as_u128(), 0x50127dc3_0f36_415e_a6cc_4cb3be910b65);
    }

    #[test]
    fn nil() {
        assert!(Guid::default().is_nil());
        assert!(!PROCESSOR_CLASS.is_nil());
    }
}
