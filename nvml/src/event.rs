use crate::error::{nvml_sym, nvml_try, NvmlError};
use crate::ffi::bindings::*;
use crate::struct_wrappers::event::EventData;
use crate::Nvml;

use std::mem;

use static_assertions::assert_impl_all;

/**
Handle to a set of events.

**Operations on a set are not thread-safe.** It does not, therefore, implement `Sync`.

You can get yourself an `EventSet` via `Nvml::create_event_set()`, and add
events to it with `DeviceApi::register_events()`. The set is freed when it is
dropped.

Lifetimes are used to enforce that each `EventSet` instance cannot be used after
the `Nvml` instance it was obtained from is dropped:

```compile_fail
use nvml::{EventSetApi, Nvml};
# use nvml::error::*;

# fn main() -> Result<(), NvmlError> {
let nvml = Nvml::init()?;
let event_set = nvml.create_event_set()?;

drop(nvml);

// This won't compile
event_set.wait(5)?;
# Ok(())
# }
```
*/
#[derive(Debug)]
pub struct EventSet<'nvml> {
    set: nvmlEventSet_t,
    nvml: &'nvml Nvml,
}

unsafe impl<'nvml> Send for EventSet<'nvml> {}

assert_impl_all!(EventSet<'static>: Send, EventSetApi<'static>);

impl<'nvml> EventSet<'nvml> {
    /**
    Create a new `EventSet` wrapper that frees the set when dropped.

    You will most likely never need to call this; see the methods available to you
    on the `Nvml` struct to get one.

    # Safety

    It is your responsibility to ensure that the given `nvmlEventSet_t` pointer
    is valid and owned by nothing else.
    */
    pub unsafe fn new(set: nvmlEventSet_t, nvml: &'nvml Nvml) -> Self {
        Self { set, nvml }
    }

    /**
    Use this to release the set's events if you care about handling
    potential errors (*the `Drop` implementation ignores errors!*).

    # Errors

    * `Uninitialized`, if the library has not been successfully initialized
    * `Unknown`, on any unexpected error
    */
    #[doc(alias = "nvmlEventSetFree")]
    pub fn release_events(self) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().event_set_free)?;

        unsafe {
            nvml_try(sym(self.set))?;
        }

        mem::forget(self);
        Ok(())
    }
}

impl<'nvml> EventSetApi<'nvml> for EventSet<'nvml> {
    unsafe fn handle(&self) -> nvmlEventSet_t {
        self.set
    }

    fn nvml(&self) -> &'nvml Nvml {
        self.nvml
    }
}

/// Operations on an event set.
pub trait EventSetApi<'nvml> {
    /// Get the raw event set handle.
    ///
    /// # Safety
    ///
    /// This is unsafe to prevent it from being used without care.
    unsafe fn handle(&self) -> nvmlEventSet_t;

    fn nvml(&self) -> &'nvml Nvml;

    /**
    Waits on events for the given timeout (in ms) and delivers one when it arrives.

    This method returns immediately if an event is ready to be delivered when it
    is called. If no events are ready it will sleep until an event arrives, but
    not longer than the specified timeout. In certain conditions, this method
    could return before the timeout passes (e.g. when an interrupt arrives).

    In the case of an XID error, the function returns the most recent XID error
    type seen by the system. If there are multiple XID errors generated before
    this method is called, the last seen XID error type will be returned for
    all XID error events.

    # Errors

    * `Uninitialized`, if the library has not been successfully initialized
    * `Timeout`, if no event arrived in the specified timeout or an interrupt
    arrived
    * `GpuLost`, if a GPU has fallen off the bus or is otherwise inaccessible
    * `Unknown`, on any unexpected error

    # Device Support

    Supports Fermi and newer fully supported devices.
    */
    #[doc(alias = "nvmlEventSetWait_v2")]
    fn wait(&self, timeout_ms: u32) -> Result<EventData<'nvml>, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().event_set_wait)?;

        unsafe {
            let mut data: nvmlEventData_t = mem::zeroed();
            nvml_try(sym(self.handle(), &mut data, timeout_ms))?;

            Ok(EventData::new(data, self.nvml()))
        }
    }
}

/// This `Drop` implementation ignores errors! Use the `.release_events()`
/// method on the `EventSet` struct if you care about handling them.
impl<'nvml> Drop for EventSet<'nvml> {
    #[doc(alias = "nvmlEventSetFree")]
    fn drop(&mut self) {
        match nvml_sym(&self.nvml.lib().event_set_free) {
            Ok(sym) => {
                if let Err(e) = unsafe { nvml_try(sym(self.set)) } {
                    log::warn!("nvmlEventSetFree failed: {}", e);
                }
            }
            Err(e) => log::warn!("{}", e),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::device::DeviceApi;
    use crate::test_utils::*;

    fn event_mock() -> MockLibrary {
        MockLibrary::new()
            .export("nvmlEventSetCreate", fake::event_set_create as usize)
            .export("nvmlEventSetFree", fake::event_set_free as usize)
            .export("nvmlEventSetWait", fake::event_set_wait as usize)
    }

    fn freed() -> usize {
        fake::FREED_EVENT_SETS.with(|f| f.get())
    }

    #[test]
    fn handle_round_trip() {
        let (nvml, _library) = mock_nvml(event_mock());
        let set = nvml.create_event_set().unwrap();

        assert_eq!(unsafe { set.handle() }, 0x5e7 as nvmlEventSet_t);
    }

    #[test]
    fn wait_falls_back_to_the_first_revision() {
        let (nvml, _library) = mock_nvml(event_mock());
        let set = nvml.create_event_set().unwrap();

        let data = set.wait(10).unwrap();
        assert_eq!(unsafe { data.device.handle() }, fake_handle(1));
        assert_eq!(
            nvml.lib().active_symbol("nvmlEventSetWait"),
            Some("nvmlEventSetWait")
        );
    }

    #[test]
    fn release_frees_once() {
        let (nvml, _library) = mock_nvml(event_mock());
        let before = freed();

        nvml.create_event_set().unwrap().release_events().unwrap();
        assert_eq!(freed(), before + 1);
    }

    #[test]
    fn drop_frees() {
        let (nvml, _library) = mock_nvml(event_mock());
        let before = freed();

        drop(nvml.create_event_set().unwrap());
        assert_eq!(freed(), before + 1);
    }

    #[test]
    fn drop_without_free_symbol() {
        let (nvml, _library) = mock_nvml(event_mock().without("nvmlEventSetFree"));
        let before = freed();

        drop(nvml.create_event_set().unwrap());
        assert_eq!(freed(), before);
    }

    // Hardware tests

    #[test]
    #[ignore = "requires NVML and a GPU"]
    fn release_events() {
        let nvml = nvml();
        test(3, || {
            let set = nvml.create_event_set()?;
            set.release_events()
        })
    }
}
