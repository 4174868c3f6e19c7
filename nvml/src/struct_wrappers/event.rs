use crate::bitmasks::event::EventTypes;
use crate::device::Device;
use crate::enums::event::XidError;
use crate::ffi::bindings::*;
use crate::Nvml;

/// Information about an event that has occurred.
#[derive(Debug)]
pub struct EventData<'nvml> {
    /**
    Device where the event occurred.

    See `DeviceApi::uuid()` for a way to compare this `Device` to another
    `Device` and find out if they represent the same physical device.
    */
    pub device: Device<'nvml>,
    /// Information about what specific event occurred.
    pub event_type: EventTypes,
    /**
    Stores the last XID error for the device for the
    nvmlEventTypeXidCriticalError event.

    `None` in the case of any other event type.
    */
    pub event_data: Option<XidError>,
    /// The GPU instance the event came from, if MIG is enabled.
    pub gpu_instance_id: Option<u32>,
    /// The compute instance the event came from, if MIG is enabled.
    pub compute_instance_id: Option<u32>,
}

impl<'nvml> EventData<'nvml> {
    /**
    Create a new `EventData` wrapper.

    The `event_type` bitmask is created via the `EventTypes::from_bits_truncate`
    method, meaning that any bits that don't correspond to flags present in this
    version of the wrapper will be dropped.

    # Safety

    The device handle inside `event_data` must be valid for `'nvml`.
    */
    pub unsafe fn new(event_data: nvmlEventData_t, nvml: &'nvml Nvml) -> Self {
        const NO_INSTANCE: u32 = 0xFFFFFFFF;

        let event_type = EventTypes::from_bits_truncate(event_data.eventType);

        EventData {
            device: Device::new(event_data.device, nvml),
            event_type,
            event_data: if event_type.contains(EventTypes::CRITICAL_XID_ERROR) {
                Some(XidError::from(event_data.eventData))
            } else {
                None
            },
            gpu_instance_id: Some(event_data.gpuInstanceId).filter(|id| *id != NO_INSTANCE),
            compute_instance_id: Some(event_data.computeInstanceId)
                .filter(|id| *id != NO_INSTANCE),
        }
    }
}
