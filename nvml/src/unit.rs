use crate::device::Device;
use crate::enum_wrappers::unit::LedColor;
use crate::enums::unit::{LedState, TemperatureReading};
use crate::error::{nvml_sym, nvml_try, NvmlError};
use crate::ffi::bindings::*;
use crate::struct_wrappers::unit::{FansInfo, PsuInfo, UnitInfo};
use crate::{query_list, Nvml};
use static_assertions::assert_impl_all;
use std::mem;
use std::{convert::TryFrom, os::raw::c_uint};

/**
Struct that represents an S-class unit.

Obtain a `Unit` with the various methods available to you on the `Nvml`
struct. Its operations live on [`UnitApi`].

Lifetimes are used to enforce that each `Unit` instance cannot be used after
the `Nvml` instance it was obtained from is dropped:

```compile_fail
use nvml::{Nvml, UnitApi};
# use nvml::error::*;

# fn main() -> Result<(), NvmlError> {
let nvml = Nvml::init()?;
let unit = nvml.unit_by_index(0)?;

drop(nvml);

// This won't compile
let unit_devices = unit.devices()?;
# Ok(())
# }
```
*/
#[derive(Debug, Clone, Copy)]
pub struct Unit<'nvml> {
    unit: nvmlUnit_t,
    nvml: &'nvml Nvml,
}

unsafe impl<'nvml> Send for Unit<'nvml> {}
unsafe impl<'nvml> Sync for Unit<'nvml> {}

assert_impl_all!(Unit<'static>: Send, Sync, UnitApi<'static>);

impl<'nvml> Unit<'nvml> {
    /**
    Create a new `Unit` wrapper.

    You will most likely never need to call this; see the methods available to you
    on the `Nvml` struct to get one.

    # Safety

    It is your responsibility to ensure that the given `nvmlUnit_t` pointer
    is valid.
    */
    pub unsafe fn new(unit: nvmlUnit_t, nvml: &'nvml Nvml) -> Self {
        Self { unit, nvml }
    }
}

impl<'nvml> UnitApi<'nvml> for Unit<'nvml> {
    unsafe fn handle(&self) -> nvmlUnit_t {
        self.unit
    }

    fn nvml(&self) -> &'nvml Nvml {
        self.nvml
    }
}

/**
Operations on an S-class unit.

All of these are for S-class products only.
*/
pub trait UnitApi<'nvml> {
    /// Get the raw unit handle.
    ///
    /// # Safety
    ///
    /// This is unsafe to prevent it from being used without care.
    unsafe fn handle(&self) -> nvmlUnit_t;

    fn nvml(&self) -> &'nvml Nvml;

    /**
    The GPUs attached to this unit.

    # Errors

    * `Uninitialized`, if the library has not been successfully initialized
    * `InvalidArg`, if the unit is invalid
    * `Unknown`, on any unexpected error
    */
    #[doc(alias = "nvmlUnitGetDevices")]
    fn devices(&self) -> Result<Vec<Device<'nvml>>, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().unit_get_devices)?;

        unsafe {
            let unit = self.handle();
            let devices = query_list(|count, devices| sym(unit, count, devices))?;

            Ok(devices
                .into_iter()
                .map(|d| Device::new(d, self.nvml()))
                .collect())
        }
    }

    /**
    Speed and state of each fan in the unit.

    # Errors

    * `Uninitialized`, if the library has not been successfully initialized
    * `InvalidArg`, if the unit is invalid
    * `NotSupported`, if this is not an S-class product
    * `UnexpectedVariant`, if a fan reports an undocumented state
    * `Unknown`, on any unexpected error
    */
    #[doc(alias = "nvmlUnitGetFanSpeedInfo")]
    fn fan_info(&self) -> Result<FansInfo, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().unit_get_fan_speed_info)?;

        FansInfo::try_from(unsafe { read(self.handle(), sym)? })
    }

    /**
    Colour of the unit's LED, and the cause when it is amber.

    # Errors

    * `Uninitialized`, if the library has not been successfully initialized
    * `InvalidArg`, if the unit is invalid
    * `NotSupported`, if this is not an S-class product
    * `Utf8Error`, if the cause is not valid UTF-8
    * `Unknown`, on any unexpected error
    */
    #[doc(alias = "nvmlUnitGetLedState")]
    fn led_state(&self) -> Result<LedState, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().unit_get_led_state)?;

        LedState::try_from(unsafe { read(self.handle(), sym)? })
    }

    /**
    Power supply readings.

    # Errors

    * `Uninitialized`, if the library has not been successfully initialized
    * `InvalidArg`, if the unit is invalid
    * `NotSupported`, if this is not an S-class product
    * `Utf8Error`, if the state string is not valid UTF-8
    * `Unknown`, on any unexpected error
    */
    #[doc(alias = "nvmlUnitGetPsuInfo")]
    fn psu_info(&self) -> Result<PsuInfo, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().unit_get_psu_info)?;

        PsuInfo::try_from(unsafe { read(self.handle(), sym)? })
    }

    /**
    One temperature reading, in °C. Which readings exist depends on the product.

    # Errors

    * `Uninitialized`, if the library has not been successfully initialized
    * `InvalidArg`, if the unit is invalid
    * `NotSupported`, if this is not an S-class product
    * `Unknown`, on any unexpected error
    */
    #[doc(alias = "nvmlUnitGetTemperature")]
    fn temperature(&self, reading_type: TemperatureReading) -> Result<u32, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().unit_get_temperature)?;
        let mut temp: c_uint = 0;

        unsafe { nvml_try(sym(self.handle(), reading_type as c_uint, &mut temp))? };
        Ok(temp)
    }

    /**
    Name, id, serial number and firmware version of the unit.

    # Errors

    * `Uninitialized`, if the library has not been successfully initialized
    * `InvalidArg`, if the unit is invalid
    * `Utf8Error`, if a string is not valid UTF-8
    */
    #[doc(alias = "nvmlUnitGetUnitInfo")]
    fn info(&self) -> Result<UnitInfo, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().unit_get_unit_info)?;

        UnitInfo::try_from(unsafe { read(self.handle(), sym)? })
    }

    /**
    Switch the unit's LED colour. Needs root, and takes effect at once.

    S-class products share their LEDs between units, so front and back LEDs of
    every unit change together.

    # Errors

    * `Uninitialized`, if the library has not been successfully initialized
    * `InvalidArg`, if the unit is invalid
    * `NotSupported`, if this is not an S-class product
    * `NoPermission`, if the caller is not root
    * `Unknown`, on any unexpected error
    */
    #[doc(alias = "nvmlUnitSetLedState")]
    fn set_led_color(&self, color: LedColor) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().unit_set_led_state)?;

        unsafe { nvml_try(sym(self.handle(), color.as_c())) }
    }
}

/// Call a `(unit, *mut T)` getter and return what it wrote.
unsafe fn read<T>(
    unit: nvmlUnit_t,
    getter: unsafe extern "C" fn(nvmlUnit_t, *mut T) -> nvmlReturn_t,
) -> Result<T, NvmlError> {
    let mut out: T = mem::zeroed();
    nvml_try(getter(unit, &mut out))?;

    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::device::DeviceApi;
    use crate::test_utils::*;

    #[test]
    fn handle_round_trip() {
        let (nvml, _library) = mock_nvml(MockLibrary::new());
        let unit = unsafe { Unit::new(fake_handle(3), &nvml) };

        assert_eq!(unsafe { unit.handle() }, fake_handle(3));
    }

    #[test]
    fn attached_devices() {
        let (nvml, _library) = mock_nvml(
            MockLibrary::new().export("nvmlUnitGetDevices", fake::unit_get_devices as usize),
        );
        let unit = unsafe { Unit::new(fake_handle(1), &nvml) };

        let devices = unit.devices().unwrap();
        assert_eq!(devices.len(), fake::DEVICE_COUNT as usize);
        assert_eq!(unsafe { devices[1].handle() }, fake_handle(2));
    }

    #[test]
    fn missing_entry_point() {
        let (nvml, _library) = mock_nvml(MockLibrary::new());
        let unit = unsafe { Unit::new(fake_handle(1), &nvml) };

        assert!(matches!(
            unit.led_state(),
            Err(NvmlError::FailedToLoadSymbol(_))
        ));
    }

    // Hardware tests. These need an S-class unit.

    #[test]
    #[ignore = "requires an S-class unit"]
    fn devices() {
        let nvml = nvml();
        let unit = unit(&nvml);
        unit.devices().expect("devices");
    }

    #[test]
    #[ignore = "requires an S-class unit"]
    fn fan_info() {
        let nvml = nvml();
        test_with_unit(3, &nvml, |unit| unit.fan_info())
    }

    #[test]
    #[ignore = "requires an S-class unit"]
    fn led_state() {
        let nvml = nvml();
        test_with_unit(3, &nvml, |unit| unit.led_state())
    }

    #[test]
    #[ignore = "requires an S-class unit"]
    fn psu_info() {
        let nvml = nvml();
        test_with_unit(3, &nvml, |unit| unit.psu_info())
    }

    #[test]
    #[ignore = "requires an S-class unit"]
    fn temperature() {
        let nvml = nvml();
        test_with_unit(3, &nvml, |unit| unit.temperature(TemperatureReading::Board))
    }

    #[test]
    #[ignore = "requires an S-class unit"]
    fn info() {
        let nvml = nvml();
        test_with_unit(3, &nvml, |unit| unit.info())
    }

    #[test]
    #[ignore = "requires an S-class unit and root"]
    fn set_led_color() {
        let nvml = nvml();
        let unit = unit(&nvml);

        unit.set_led_color(LedColor::Amber).expect("set to true")
    }
}
