use crate::enum_wrappers::device::GpmMetricId;
use crate::error::{nvml_try, NvmlError};
use crate::ffi::bindings::*;
use crate::gpm::GpmSampleApi;
use std::convert::TryFrom;
use std::ffi::CStr;
use std::os::raw::c_char;
use std::{fmt, mem};

/**
A request for GPU performance metrics computed between two samples, and
the results NVML writes back into it.

Build one with [`GpmMetricsGet::new`], pass it to `Nvml::gpm_metrics_get()`
and read the results with [`GpmMetricsGet::metrics`].
*/
pub struct GpmMetricsGet {
    pub(crate) raw: nvmlGpmMetricsGet_t,
}

impl GpmMetricsGet {
    /**
    Request `metrics` computed between `sample1` and the later `sample2`.

    # Errors

    * `InvalidArg`, if more than `NVML_GPM_METRIC_MAX` metrics are requested
    */
    pub fn new<'nvml>(
        sample1: &impl GpmSampleApi<'nvml>,
        sample2: &impl GpmSampleApi<'nvml>,
        metrics: &[GpmMetricId],
    ) -> Result<Self, NvmlError> {
        if metrics.len() > NVML_GPM_METRIC_MAX as usize {
            return Err(NvmlError::InvalidArg);
        }

        let mut raw: nvmlGpmMetricsGet_t = unsafe { mem::zeroed() };
        raw.version = NVML_GPM_METRICS_GET_VERSION;
        raw.numMetrics = metrics.len() as u32;
        unsafe {
            raw.sample1 = sample1.handle();
            raw.sample2 = sample2.handle();
        }

        for (slot, id) in raw.metrics.iter_mut().zip(metrics) {
            slot.metricId = id.as_c();
        }

        Ok(Self { raw })
    }

    /// The layout version this request was built for.
    pub fn version(&self) -> u32 {
        self.raw.version
    }

    /// The raw C struct, as NVML last wrote it.
    pub fn as_raw(&self) -> &nvmlGpmMetricsGet_t {
        &self.raw
    }

    /**
    The requested metrics, in request order.

    # Errors

    * `UnexpectedVariant`, if NVML reports a metric ID this crate does not know
    */
    pub fn metrics(&self) -> Result<Vec<GpmMetric>, NvmlError> {
        let count = (self.raw.numMetrics as usize).min(self.raw.metrics.len());

        self.raw.metrics[..count]
            .iter()
            .map(GpmMetric::try_from)
            .collect()
    }
}

impl fmt::Debug for GpmMetricsGet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GpmMetricsGet")
            .field("version", &self.raw.version)
            .field("num_metrics", &self.raw.numMetrics)
            .finish()
    }
}

/// One computed GPU performance metric.
#[derive(Debug)]
pub struct GpmMetric {
    pub id: GpmMetricId,
    /// The metric's value, or why NVML could not compute it.
    pub value: Result<f64, NvmlError>,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub unit: Option<String>,
}

unsafe fn metric_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        None
    } else {
        Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
    }
}

impl TryFrom<&nvmlGpmMetric_t> for GpmMetric {
    type Error = NvmlError;

    fn try_from(raw: &nvmlGpmMetric_t) -> Result<Self, Self::Error> {
        // The name strings are static storage inside NVML.
        unsafe {
            Ok(Self {
                id: GpmMetricId::try_from(raw.metricId)?,
                value: nvml_try(raw.nvmlReturn).map(|_| raw.value),
                short_name: metric_string(raw.metricInfo.shortName),
                long_name: metric_string(raw.metricInfo.longName),
                unit: metric_string(raw.metricInfo.unit),
            })
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::gpm::GpmSample;
    use crate::test_utils::{fake_handle, mock_nvml, MockLibrary};
    use std::ptr;

    #[test]
    fn request_layout() {
        let (nvml, _library) = mock_nvml(MockLibrary::new());
        // Never freed: dropping would call into the mock.
        let first = mem::ManuallyDrop::new(unsafe { GpmSample::new(fake_handle(1), &nvml) });
        let second = mem::ManuallyDrop::new(unsafe { GpmSample::new(fake_handle(2), &nvml) });

        let request = GpmMetricsGet::new(
            &*first,
            &*second,
            &[GpmMetricId::SmUtil, GpmMetricId::DramBwUtil],
        )
        .unwrap();

        assert_eq!(request.version(), NVML_GPM_METRICS_GET_VERSION);
        assert_eq!(request.as_raw().numMetrics, 2);
        assert_eq!(request.as_raw().sample1, fake_handle(1));
        assert_eq!(request.as_raw().metrics[1].metricId, 10);
    }

    #[test]
    fn results() {
        let mut raw: nvmlGpmMetricsGet_t = unsafe { mem::zeroed() };
        raw.numMetrics = 2;
        raw.metrics[0] = nvmlGpmMetric_t {
            metricId: GpmMetricId::SmUtil.as_c(),
            nvmlReturn: nvmlReturn_enum_NVML_SUCCESS,
            value: 42.5,
            metricInfo: nvmlGpmMetricInfo_t {
                shortName: b"SM\0".as_ptr() as *mut c_char,
                longName: ptr::null_mut(),
                unit: ptr::null_mut(),
            },
        };
        raw.metrics[1].metricId = GpmMetricId::Fp64Util.as_c();
        raw.metrics[1].nvmlReturn = nvmlReturn_enum_NVML_ERROR_NOT_SUPPORTED;

        let metrics = GpmMetricsGet { raw }.metrics().unwrap();
        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0].id, GpmMetricId::SmUtil);
        assert_eq!(metrics[0].value.as_ref().ok(), Some(&42.5));
        assert_eq!(metrics[0].short_name.as_deref(), Some("SM"));
        assert!(matches!(metrics[1].value, Err(NvmlError::NotSupported)));
    }

    #[test]
    fn too_many_metrics() {
        let (nvml, _library) = mock_nvml(MockLibrary::new());
        let sample = mem::ManuallyDrop::new(unsafe { GpmSample::new(fake_handle(1), &nvml) });
        let ids = vec![GpmMetricId::SmUtil; NVML_GPM_METRIC_MAX as usize + 1];

        assert!(matches!(
            GpmMetricsGet::new(&*sample, &*sample, &ids),
            Err(NvmlError::InvalidArg)
        ));
    }
}
