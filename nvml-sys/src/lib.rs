/*!
Raw C ABI for the [NVIDIA Management Library][nvml] (NVML).

See the `nvml` crate for a safe wrapper over top of these bindings.

## Type of Bindings

Nothing here links against NVML. Types, constants and return codes mirror
`nvml.h`, and every function is reached through [`bindings::NvmlLib`], a
table of function pointers resolved from a library opened at runtime by
[`nvml_dl`]. NVIDIA does not ship a static NVML, and a binary that links it
at build time can only start on machines with a working driver install;
loading at runtime lets callers drop NVIDIA features on machines without one.

## Versioned Functions

NVML bumps individual functions rather than the whole API:

```text
nvmlDeviceGetComputeRunningProcesses
nvmlDeviceGetComputeRunningProcesses_v2
nvmlDeviceGetComputeRunningProcesses_v3
```

Older revisions keep working with newer drivers, but newer revisions are
missing from older drivers. The table keeps one slot per revision and, per
logical operation, one slot bound to the newest revision the loaded library
exports. See [`bindings::NvmlLib::VERSIONED`].

[nvml]: https://developer.nvidia.com/nvidia-management-library-nvml
*/

// Names follow nvml.h
#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
#![allow(clippy::missing_safety_doc)]

pub mod bindings;

pub use nvml_dl;
