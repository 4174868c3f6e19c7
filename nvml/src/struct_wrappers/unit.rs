use crate::enum_wrappers::unit::FanState;
use crate::error::NvmlError;
use crate::ffi::bindings::*;
use crate::struct_wrappers::fixed_string;
#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};
use std::convert::TryFrom;

/// Speed and state of every fan an S-class unit reports.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FansInfo {
    pub fans: Vec<FanInfo>,
}

impl TryFrom<nvmlUnitFanSpeeds_t> for FansInfo {
    type Error = NvmlError;

    /**
    Read the first `count` entries of the C struct's fixed fan array.

    # Errors

    * `UnexpectedVariant`, if a fan reports an undocumented state
    */
    fn try_from(value: nvmlUnitFanSpeeds_t) -> Result<Self, Self::Error> {
        let fans = value.fans[..(value.count as usize).min(value.fans.len())]
            .iter()
            .map(|fan| {
                FanState::try_from(fan.state).map(|state| FanInfo {
                    speed: fan.speed,
                    state,
                })
            })
            .collect::<Result<_, NvmlError>>()?;

        Ok(FansInfo { fans })
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FanInfo {
    /// RPM.
    pub speed: u32,
    pub state: FanState,
}

/// Readings from an S-class unit's power supply.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PsuInfo {
    /// Amperes.
    pub current: u32,
    /// Watts.
    pub power_draw: u32,
    /// Volts.
    pub voltage: u32,
    /// "Normal", or "Abnormal" followed by the causes NVML lists.
    pub state: String,
}

impl TryFrom<nvmlPSUInfo_t> for PsuInfo {
    type Error = NvmlError;

    fn try_from(value: nvmlPSUInfo_t) -> Result<Self, Self::Error> {
        Ok(PsuInfo {
            current: value.current,
            power_draw: value.power,
            voltage: value.voltage,
            state: fixed_string(&value.state)?,
        })
    }
}

/// Identity of an S-class unit.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnitInfo {
    pub name: String,
    pub id: String,
    pub serial: String,
    pub firmware_version: String,
}

impl TryFrom<nvmlUnitInfo_t> for UnitInfo {
    type Error = NvmlError;

    fn try_from(value: nvmlUnitInfo_t) -> Result<Self, Self::Error> {
        Ok(UnitInfo {
            name: fixed_string(&value.name)?,
            id: fixed_string(&value.id)?,
            serial: fixed_string(&value.serial)?,
            firmware_version: fixed_string(&value.firmwareVersion)?,
        })
    }
}

/// A host interface card, as listed by `Nvml::hic_versions`.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HwbcEntry {
    pub id: u32,
    pub firmware_version: String,
}

impl TryFrom<nvmlHwbcEntry_t> for HwbcEntry {
    type Error = NvmlError;

    fn try_from(value: nvmlHwbcEntry_t) -> Result<Self, Self::Error> {
        Ok(HwbcEntry {
            id: value.hwbcId,
            firmware_version: fixed_string(&value.firmwareVersion)?,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::mem;
    use std::os::raw::c_char;

    fn write(dst: &mut [c_char], src: &str) {
        for (d, s) in dst.iter_mut().zip(src.bytes()) {
            *d = s as c_char;
        }
    }

    #[test]
    fn fans_beyond_count_are_ignored() {
        let mut raw: nvmlUnitFanSpeeds_t = unsafe { mem::zeroed() };
        raw.count = 2;
        raw.fans[0].speed = 1200;
        raw.fans[1].speed = 1300;
        raw.fans[1].state = nvmlFanState_enum_NVML_FAN_FAILED;
        raw.fans[2].state = 77;

        let info = FansInfo::try_from(raw).unwrap();
        assert_eq!(info.fans.len(), 2);
        assert_eq!(info.fans[0].speed, 1200);
        assert_eq!(info.fans[1].state, FanState::Failed);
    }

    #[test]
    fn fan_count_larger_than_the_array() {
        let mut raw: nvmlUnitFanSpeeds_t = unsafe { mem::zeroed() };
        raw.count = u32::MAX;

        let info = FansInfo::try_from(raw).unwrap();
        assert_eq!(info.fans.len(), raw.fans.len());
    }

    #[test]
    fn unexpected_fan_state() {
        let mut raw: nvmlUnitFanSpeeds_t = unsafe { mem::zeroed() };
        raw.count = 1;
        raw.fans[0].state = 77;

        assert!(matches!(
            FansInfo::try_from(raw),
            Err(NvmlError::UnexpectedVariant(77))
        ));
    }

    #[test]
    fn unit_and_psu_strings() {
        let mut unit: nvmlUnitInfo_t = unsafe { mem::zeroed() };
        write(&mut unit.name, "S-class");
        write(&mut unit.serial, "0323");
        let unit = UnitInfo::try_from(unit).unwrap();
        assert_eq!(unit.name, "S-class");
        assert_eq!(unit.serial, "0323");
        assert_eq!(unit.id, "");

        let mut psu: nvmlPSUInfo_t = unsafe { mem::zeroed() };
        psu.power = 450;
        write(&mut psu.state, "Abnormal High voltage");
        let psu = PsuInfo::try_from(psu).unwrap();
        assert_eq!(psu.power_draw, 450);
        assert_eq!(psu.state, "Abnormal High voltage");
    }
}
