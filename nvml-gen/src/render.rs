/*!
Turns parsed declarations into the `RawApi` source file.

Each wrapper is named after its symbol with the `nvml` prefix stripped and
snake cased, which is also the name of the `NvmlLib` field it calls. Parameters
are translated by their C type:

| C parameter                                | Rust parameter                  |
|--------------------------------------------|---------------------------------|
| registered handle, by value                | `&impl XApi<'nvml>`             |
| owned handle, in its release entry point   | `X<'nvml>`, forgotten on success|
| `*const c_char`                            | `&CStr`                         |
| `*mut c_char [len]`                        | `&mut Option<String>`           |
| `*mut` decorated struct                    | `&mut X`                        |
| `*mut` registered type `[len]`             | `&mut Vec<X<'nvml>>`            |
| `*mut` registered type                     | `&mut Option<X<'nvml>>`         |
| anything else                              | passed through unchanged        |

Output parameters are only written once the call has succeeded.
*/

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use heck::ToSnakeCase;

use crate::idl::{parse_error, Alias, Function, TypeDecl, TypeKind, TypeRegistry};
use crate::GenError;

const MAX_USE_WIDTH: usize = 100;

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "box", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while", "yield",
];

const TEMPLATE: &str = r#"// Generated by nvml-gen from nvml/idl. Do not edit.

/*!
Thin `unsafe` wrappers over the NVML entry points declared in `nvml/idl`.

Every method maps the call's status to a `Result`, takes handles through their
capability traits and hands back handle structs. Output values are written
only when the call succeeds. Nothing else is checked: each entry point's
contract in `nvml.h` is the caller's to uphold.
*/

__IMPORTS__
/// The raw NVML API, obtained with `Nvml::raw_api()`.
#[derive(Debug, Clone, Copy)]
pub struct RawApi<'nvml> {
    nvml: &'nvml Nvml,
}

impl<'nvml> RawApi<'nvml> {
    pub(crate) fn new(nvml: &'nvml Nvml) -> Self {
        Self { nvml }
    }
__METHODS__}

/// The buffer's address, or null when it is empty.
fn buffer_ptr<T>(buffer: &mut [T]) -> *mut T {
    if buffer.is_empty() {
        std::ptr::null_mut()
    } else {
        buffer.as_mut_ptr()
    }
}

/// Decode the NUL-terminated string NVML wrote into `buffer`.
fn decode_string(buffer: &[std::os::raw::c_char]) -> Result<String, NvmlError> {
    let bytes: Vec<u8> = buffer.iter().map(|c| *c as u8).collect();
    let text = match std::ffi::CStr::from_bytes_until_nul(&bytes) {
        Ok(text) => text.to_str()?,
        Err(_) => std::str::from_utf8(&bytes)?,
    };

    Ok(text.to_owned())
}

#[cfg(test)]
mod test;
"#;

/// One method of the generated API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wrapper<'a> {
    /// Method name, and the `NvmlLib` field it calls.
    pub name: String,
    /// Symbol name without the `nvml` prefix; wrappers are ordered by it.
    pub public: String,
    pub symbol: String,
    /// Declaration the parameters are taken from.
    pub decl: &'a Function,
    /// The revision an unversioned alias shares its declaration with.
    pub alias_of: Option<&'a str>,
}

/// Snake-cased method name for an `nvml`-prefixed symbol.
pub fn method_name(symbol: &str) -> Option<String> {
    symbol
        .strip_prefix("nvml")
        .map(|public| rust_ident(public.to_snake_case()))
}

fn rust_ident(mut name: String) -> String {
    if KEYWORDS.contains(&name.as_str()) {
        name.push('_');
    }
    name
}

/// `nvmlFoo_v2` -> `nvmlFoo`.
fn base_name(symbol: &str) -> &str {
    match symbol.rsplit_once("_v") {
        Some((base, version))
            if !version.is_empty() && version.chars().all(|c| c.is_ascii_digit()) =>
        {
            base
        }
        _ => symbol,
    }
}

/**
Collect one wrapper per status-returning declaration and per alias, sorted by
public name.

An alias whose target is not declared is skipped with a warning. Every declared
revision of an alias must take the same parameters as its target.
*/
pub fn wrappers<'a>(
    entry_points_file: &Path,
    aliases_file: &Path,
    functions: &'a [Function],
    aliases: &'a [Alias],
) -> Result<Vec<Wrapper<'a>>, GenError> {
    let mut by_name: BTreeMap<String, Wrapper<'a>> = BTreeMap::new();
    let mut declared: BTreeMap<&str, &'a Function> = BTreeMap::new();

    for function in functions {
        if declared.insert(function.symbol.as_str(), function).is_some() {
            return Err(parse_error(
                entry_points_file,
                function.line,
                format!("`{}` is declared twice", function.symbol),
            ));
        }

        if !function.returns_status() {
            log::debug!(
                "{} returns {}, not wrapping it",
                function.symbol,
                function.ret.as_deref().unwrap_or_default()
            );
            continue;
        }

        let Some(name) = method_name(&function.symbol) else {
            log::warn!("{} has no `nvml` prefix, not wrapping it", function.symbol);
            continue;
        };

        let wrapper = Wrapper {
            name: name.clone(),
            public: function.symbol["nvml".len()..].to_owned(),
            symbol: function.symbol.clone(),
            decl: function,
            alias_of: None,
        };
        if let Some(earlier) = by_name.insert(name, wrapper) {
            return Err(parse_error(
                entry_points_file,
                function.line,
                format!("`{}` and `{}` map to the same method", earlier.symbol, function.symbol),
            ));
        }
    }

    for alias in aliases {
        let Some(target) = declared.get(alias.target.as_str()).copied() else {
            log::warn!(
                "skipping alias {}: {} is not declared",
                alias.name,
                alias.target
            );
            continue;
        };

        if base_name(&alias.target) != base_name(&alias.name) {
            return Err(parse_error(
                aliases_file,
                alias.line,
                format!("`{}` is not a revision of `{}`", alias.target, alias.name),
            ));
        }

        let group = base_name(&alias.name);
        let expected = target.param_types();
        if let Some(other) = functions
            .iter()
            .filter(|f| base_name(&f.symbol) == group)
            .find(|f| f.param_types() != expected)
        {
            return Err(GenError::SignatureMismatch {
                alias: alias.name.clone(),
                target: alias.target.clone(),
                other: other.symbol.clone(),
            });
        }

        if !target.returns_status() {
            log::warn!(
                "skipping alias {}: {} does not return a status",
                alias.name,
                alias.target
            );
            continue;
        }

        let Some(name) = method_name(&alias.name) else {
            log::warn!("{} has no `nvml` prefix, not wrapping it", alias.name);
            continue;
        };

        let wrapper = Wrapper {
            name: name.clone(),
            public: alias.name["nvml".len()..].to_owned(),
            symbol: alias.name.clone(),
            decl: target,
            alias_of: Some(alias.target.as_str()),
        };
        if let Some(earlier) = by_name.insert(name, wrapper) {
            return Err(parse_error(
                aliases_file,
                alias.line,
                format!("`{}` and `{}` map to the same method", earlier.symbol, alias.name),
            ));
        }
    }

    let mut wrappers: Vec<_> = by_name.into_values().collect();
    wrappers.sort_by(|a, b| a.public.cmp(&b.public));

    Ok(wrappers)
}

/// Render the whole source file.
pub fn render(
    entry_points_file: &Path,
    types: &TypeRegistry,
    wrappers: &[Wrapper<'_>],
) -> Result<String, GenError> {
    let mut imports = Imports::default();
    let mut methods = String::new();

    for wrapper in wrappers {
        methods.push_str(&render_method(
            entry_points_file,
            types,
            wrapper,
            &mut imports,
        )?);
    }

    Ok(TEMPLATE
        .replace("__IMPORTS__", &imports.render())
        .replace("__METHODS__", &methods))
}

#[derive(Debug, Default)]
struct Imports {
    cstr: bool,
    mem: bool,
    raw_c: BTreeSet<String>,
    wrappers: BTreeSet<String>,
    root: BTreeSet<String>,
}

impl Imports {
    fn public(&mut self, decl: &TypeDecl) {
        match decl.kind {
            TypeKind::Interface | TypeKind::Owned { .. } => self.root.insert(decl.public.clone()),
            _ => self.wrappers.insert(decl.public.clone()),
        };
    }

    fn c_types(&mut self, ty: &str) {
        for token in ty.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_')) {
            if token.starts_with("c_") {
                self.raw_c.insert(token.to_owned());
            }
        }
    }

    fn render(&self) -> String {
        let mut out = String::new();

        let mut std_group = Vec::new();
        if self.cstr {
            std_group.push(use_line("std::ffi", &["CStr".to_owned()]));
        }
        if self.mem {
            std_group.push("use std::mem;".to_owned());
        }
        if !self.raw_c.is_empty() {
            let items: Vec<String> = self.raw_c.iter().cloned().collect();
            std_group.push(use_line("std::os::raw", &items));
        }
        if !std_group.is_empty() {
            for line in std_group {
                out.push_str(&line);
                out.push('\n');
            }
            out.push('\n');
        }

        out.push_str("use crate::error::{nvml_sym, nvml_try, NvmlError};\n");
        out.push_str("use crate::ffi::bindings::*;\n");
        if !self.wrappers.is_empty() {
            let items: Vec<String> = self.wrappers.iter().cloned().collect();
            out.push_str(&use_line("crate::struct_wrappers", &items));
            out.push('\n');
        }

        let mut root = self.root.clone();
        root.insert("Nvml".to_owned());
        let items: Vec<String> = root.into_iter().collect();
        out.push_str(&use_line("crate", &items));
        out.push('\n');

        out
    }
}

fn use_line(path: &str, items: &[String]) -> String {
    if let [item] = items {
        return format!("use {}::{};", path, item);
    }

    let single = format!("use {}::{{{}}};", path, items.join(", "));
    if single.len() <= MAX_USE_WIDTH {
        return single;
    }

    let mut out = format!("use {}::{{\n", path);
    for item in items {
        out.push_str(&format!("    {},\n", item));
    }
    out.push_str("};");
    out
}

/// How one C parameter crosses into Rust.
enum Shape<'t> {
    Handle(&'t TypeDecl),
    Consumed(&'t TypeDecl),
    CStrIn,
    StringOut { len: String },
    Decorated(&'t TypeDecl, &'t str),
    Array { decl: &'t TypeDecl, len: String, len_is_ptr: bool },
    Out(&'t TypeDecl),
    Raw,
}

fn shape<'t>(
    entry_points_file: &Path,
    types: &'t TypeRegistry,
    function: &Function,
    index: usize,
) -> Result<Shape<'t>, GenError> {
    let param = &function.params[index];

    if let Some(decl) = types.get(&param.ty) {
        match &decl.kind {
            TypeKind::Owned { release } if *release == function.symbol => {
                return Ok(Shape::Consumed(decl));
            }
            _ if decl.is_handle() => return Ok(Shape::Handle(decl)),
            _ => {}
        }
    }
    if param.ty == "*const c_char" {
        return Ok(Shape::CStrIn);
    }

    let len = match param.len.as_deref() {
        Some(len) => {
            let len_param = function
                .params
                .iter()
                .find(|p| p.name == len)
                .ok_or_else(|| {
                    parse_error(
                        entry_points_file,
                        function.line,
                        format!("`[{}]` names no parameter of `{}`", len, function.symbol),
                    )
                })?;
            let is_ptr = len_param.ty.starts_with("*mut ");
            let expr = param_ident(&len_param.name);
            Some((if is_ptr { format!("*{}", expr) } else { expr }, is_ptr))
        }
        None => None,
    };

    let Some(pointee) = param.ty.strip_prefix("*mut ") else {
        return Ok(Shape::Raw);
    };

    if pointee == "c_char" {
        if let Some((len, _)) = len {
            return Ok(Shape::StringOut { len });
        }
        return Ok(Shape::Raw);
    }

    let Some(decl) = types.get(pointee) else {
        return Ok(Shape::Raw);
    };

    Ok(match (&decl.kind, len) {
        (TypeKind::Decorated { field }, _) => Shape::Decorated(decl, field.as_str()),
        (_, Some((len, len_is_ptr))) => Shape::Array {
            decl,
            len,
            len_is_ptr,
        },
        (_, None) => Shape::Out(decl),
    })
}

fn param_ident(name: &str) -> String {
    rust_ident(name.to_snake_case())
}

fn owned_type(decl: &TypeDecl) -> String {
    match decl.kind {
        TypeKind::Decorated { .. } => decl.public.clone(),
        _ => format!("{}<'nvml>", decl.public),
    }
}

fn convert(decl: &TypeDecl, raw: &str) -> String {
    let by_field = decl.kind == TypeKind::Convert
        && ["Info", "Stats", "Settings"]
            .iter()
            .any(|suffix| decl.public.ends_with(suffix));
    let constructor = if by_field { "convert" } else { "new" };

    format!("{}::{}({}, self.nvml)", decl.public, constructor, raw)
}

fn render_method(
    entry_points_file: &Path,
    types: &TypeRegistry,
    wrapper: &Wrapper<'_>,
    imports: &mut Imports,
) -> Result<String, GenError> {
    let mut sig = Vec::new();
    let mut pre = Vec::new();
    let mut args = Vec::new();
    let mut post = Vec::new();

    for (index, param) in wrapper.decl.params.iter().enumerate() {
        let name = param_ident(&param.name);

        match shape(entry_points_file, types, wrapper.decl, index)? {
            Shape::Handle(decl) => {
                imports.public(decl);
                imports.root.insert(format!("{}Api", decl.public));
                sig.push(format!("{}: &impl {}Api<'nvml>", name, decl.public));
                args.push(format!("{}.handle()", name));
            }
            Shape::Consumed(decl) => {
                imports.public(decl);
                imports.root.insert(format!("{}Api", decl.public));
                imports.mem = true;
                sig.push(format!("{}: {}", name, owned_type(decl)));
                args.push(format!("{}.handle()", name));
                post.push(format!("mem::forget({});", name));
            }
            Shape::CStrIn => {
                imports.cstr = true;
                sig.push(format!("{}: &CStr", name));
                args.push(format!("{}.as_ptr()", name));
            }
            Shape::StringOut { len } => {
                imports.c_types("c_char");
                sig.push(format!("{}: &mut Option<String>", name));
                pre.push(format!(
                    "let mut {}_buf: Vec<c_char> = vec![0; {} as usize];",
                    name, len
                ));
                args.push(format!("{}_buf.as_mut_ptr()", name));
                post.push(format!("*{} = Some(decode_string(&{}_buf)?);", name, name));
            }
            Shape::Decorated(decl, field) => {
                imports.public(decl);
                sig.push(format!("{}: &mut {}", name, decl.public));
                args.push(format!("&mut {}.{}", name, field));
            }
            Shape::Array {
                decl,
                len,
                len_is_ptr,
            } => {
                imports.public(decl);
                imports.mem = true;
                sig.push(format!("{}: &mut Vec<{}>", name, owned_type(decl)));
                pre.push(format!(
                    "let mut {}_raw: Vec<{}> = vec![mem::zeroed(); {} as usize];",
                    name,
                    decl.raw(),
                    len
                ));
                args.push(format!("buffer_ptr(&mut {}_raw)", name));
                if len_is_ptr {
                    post.push(format!("{}_raw.truncate({} as usize);", name, len));
                }
                post.push(format!(
                    "*{} = {}_raw.into_iter().map(|raw| {}).collect();",
                    name,
                    name,
                    convert(decl, "raw")
                ));
            }
            Shape::Out(decl) => {
                imports.public(decl);
                imports.mem = true;
                sig.push(format!("{}: &mut Option<{}>", name, owned_type(decl)));
                pre.push(format!("let mut {}_raw: {} = mem::zeroed();", name, decl.raw()));
                args.push(format!("&mut {}_raw", name));
                post.push(format!(
                    "*{} = Some({});",
                    name,
                    convert(decl, &format!("{}_raw", name))
                ));
            }
            Shape::Raw => {
                imports.c_types(&param.ty);
                sig.push(format!("{}: {}", name, param.ty));
                args.push(name);
            }
        }
    }

    let mut out = String::from("\n");
    match wrapper.alias_of {
        None => out.push_str(&format!("    /// Calls `{}`.\n", wrapper.symbol)),
        Some(target) => out.push_str(&format!(
            "    /// Calls the newest exported revision of `{}`, declared as `{}`.\n",
            wrapper.symbol, target
        )),
    }
    out.push_str(&format!("    #[doc(alias = \"{}\")]\n", wrapper.symbol));

    if sig.is_empty() {
        out.push_str(&format!(
            "    pub unsafe fn {}(&self) -> Result<(), NvmlError> {{\n",
            wrapper.name
        ));
    } else {
        out.push_str(&format!("    pub unsafe fn {}(\n", wrapper.name));
        out.push_str("        &self,\n");
        for line in &sig {
            out.push_str(&format!("        {},\n", line));
        }
        out.push_str("    ) -> Result<(), NvmlError> {\n");
    }

    out.push_str(&format!(
        "        let sym = nvml_sym(&self.nvml.lib().{})?;\n",
        wrapper.name
    ));
    for line in &pre {
        out.push_str(&format!("        {}\n", line));
    }
    out.push_str(&format!("        nvml_try(sym({}))?;\n", args.join(", ")));
    for line in &post {
        out.push_str(&format!("        {}\n", line));
    }
    out.push_str("        Ok(())\n");
    out.push_str("    }\n");

    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::idl::{parse_aliases, parse_entry_points, parse_types};

    const TYPES: &str = "interface Device\n\
                         owned EventSet { nvmlEventSetFree }\n\
                         convert GpuInstanceInfo\n\
                         decorated VgpuMetadata { raw }\n";

    fn file() -> &'static Path {
        Path::new("test.idl")
    }

    fn generate(entry_points: &str, aliases: &str) -> Result<String, GenError> {
        let types = parse_types(file(), TYPES)?;
        let functions = parse_entry_points(file(), entry_points)?;
        let aliases = parse_aliases(file(), aliases)?;
        let wrappers = wrappers(file(), file(), &functions, &aliases)?;

        render(file(), &types, &wrappers)
    }

    fn block(aliases: &str) -> String {
        format!(
            "BEGIN_UNVERSIONED_FUNCTIONS\n{}END_UNVERSIONED_FUNCTIONS\n",
            aliases
        )
    }

    #[test]
    fn method_names() {
        assert_eq!(method_name("nvmlInit_v2").unwrap(), "init_v2");
        assert_eq!(
            method_name("nvmlSystemGetNVMLVersion").unwrap(),
            "system_get_nvml_version"
        );
        assert_eq!(
            method_name("nvmlDeviceGetHandleByUUID").unwrap(),
            "device_get_handle_by_uuid"
        );
        assert_eq!(
            method_name("nvmlDeviceGetMPSComputeRunningProcesses_v3").unwrap(),
            "device_get_mps_compute_running_processes_v3"
        );
        assert_eq!(method_name("cuInit"), None);
        assert_eq!(param_ident("type"), "type_");
        assert_eq!(param_ident("pciBusId"), "pci_bus_id");
    }

    #[test]
    fn base_names() {
        assert_eq!(base_name("nvmlDeviceGetPciInfo_v3"), "nvmlDeviceGetPciInfo");
        assert_eq!(base_name("nvmlDeviceGetPciInfo"), "nvmlDeviceGetPciInfo");
        assert_eq!(base_name("nvmlDeviceGetPciInfo_vX"), "nvmlDeviceGetPciInfo_vX");
    }

    #[test]
    fn output_is_deterministic_and_sorted() {
        let entry_points = "fn nvmlShutdown()\nfn nvmlInit_v2()\nfn nvmlDeviceGetCount_v2(deviceCount: *mut c_uint)\n";
        let aliases = block("nvmlInit = nvmlInit_v2\n");

        let first = generate(entry_points, &aliases).unwrap();
        let second = generate(entry_points, &aliases).unwrap();
        assert_eq!(first, second);

        let order: Vec<usize> = ["fn device_get_count_v2(", "fn init(", "fn init_v2(", "fn shutdown("]
            .iter()
            .map(|needle| first.find(needle).unwrap())
            .collect();
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(order, sorted);
    }

    #[test]
    fn status_returning_functions_only() {
        let out = generate(
            "fn nvmlErrorString(result: nvmlReturn_t) -> *const c_char\nfn nvmlShutdown() -> nvmlReturn_t\n",
            "",
        )
        .unwrap();

        assert!(out.contains("pub unsafe fn shutdown(&self) -> Result<(), NvmlError> {"));
        assert!(!out.contains("error_string"));
    }

    #[test]
    fn parameter_shapes() {
        let out = generate(
            "fn nvmlDeviceGetHandleByUUID(uuid: *const c_char, device: *mut nvmlDevice_t)\n\
             fn nvmlDeviceGetName(device: nvmlDevice_t, name: *mut c_char [length], length: c_uint)\n\
             fn nvmlUnitGetDevices(unit: nvmlUnit_t, deviceCount: *mut c_uint, devices: *mut nvmlDevice_t [deviceCount])\n\
             fn nvmlGpuInstanceGetInfo(gpuInstance: nvmlGpuInstance_t, info: *mut nvmlGpuInstanceInfo_t)\n\
             fn nvmlVgpuInstanceGetMetadata(vgpuInstance: nvmlVgpuInstance_t, vgpuMetadata: *mut nvmlVgpuMetadata_t, bufferSize: *mut c_uint)\n",
            "",
        )
        .unwrap();

        assert!(out.contains("        uuid: &CStr,\n        device: &mut Option<Device<'nvml>>,\n"));
        assert!(out.contains("nvml_try(sym(uuid.as_ptr(), &mut device_raw))?;"));
        assert!(out.contains("*device = Some(Device::new(device_raw, self.nvml));"));

        assert!(out.contains("        device: &impl DeviceApi<'nvml>,\n        name: &mut Option<String>,\n"));
        assert!(out.contains("let mut name_buf: Vec<c_char> = vec![0; length as usize];"));

        assert!(out.contains("unit: nvmlUnit_t,"));
        assert!(out.contains("devices: &mut Vec<Device<'nvml>>,"));
        assert!(out.contains("vec![mem::zeroed(); *device_count as usize];"));
        assert!(out.contains("devices_raw.truncate(*device_count as usize);"));

        assert!(out.contains("*info = Some(GpuInstanceInfo::convert(info_raw, self.nvml));"));
        assert!(out.contains("nvml_try(sym(vgpu_instance, &mut vgpu_metadata.raw, buffer_size))?;"));

        assert!(out.contains("use std::ffi::CStr;\nuse std::mem;\nuse std::os::raw::{c_char, c_uint};\n"));
        assert!(out.contains("use crate::struct_wrappers::{GpuInstanceInfo, VgpuMetadata};\n"));
        assert!(out.contains("use crate::{Device, DeviceApi, Nvml};\n"));
    }

    #[test]
    fn release_entry_point_consumes_its_handle() {
        let out = generate(
            "fn nvmlEventSetCreate(set: *mut nvmlEventSet_t)\n\
             fn nvmlEventSetFree(set: nvmlEventSet_t)\n\
             fn nvmlEventSetWait_v2(set: nvmlEventSet_t, data: *mut nvmlEventData_t, timeoutms: c_uint)\n",
            "",
        )
        .unwrap();

        assert!(out.contains(
            "    pub unsafe fn event_set_free(\n        &self,\n        set: EventSet<'nvml>,\n    )"
        ));
        let call = out.find("nvml_try(sym(set.handle()))?;").unwrap();
        let forget = out.find("mem::forget(set);").unwrap();
        assert!(call < forget);

        assert!(out.contains("        set: &impl EventSetApi<'nvml>,\n        data: *mut nvmlEventData_t,\n"));
        assert!(out.contains("*set = Some(EventSet::new(set_raw, self.nvml));"));
        assert!(out.contains("use crate::{EventSet, EventSetApi, Nvml};\n"));
    }

    #[test]
    fn outputs_are_written_after_the_call() {
        let out = generate(
            "fn nvmlDeviceGetHandleByIndex_v2(index: c_uint, device: *mut nvmlDevice_t)\n",
            "",
        )
        .unwrap();

        let call = out.find("nvml_try(sym(index, &mut device_raw))?;").unwrap();
        let write = out.find("*device = Some(").unwrap();
        assert!(call < write);
    }

    #[test]
    fn alias_takes_its_targets_parameters() {
        let out = generate(
            "fn nvmlDeviceGetPciInfo_v2(device: nvmlDevice_t, pci: *mut nvmlPciInfo_t)\n\
             fn nvmlDeviceGetPciInfo_v3(device: nvmlDevice_t, pci: *mut nvmlPciInfo_t)\n",
            &block("nvmlDeviceGetPciInfo = nvmlDeviceGetPciInfo_v3\n"),
        )
        .unwrap();

        assert!(out.contains(
            "    /// Calls the newest exported revision of `nvmlDeviceGetPciInfo`, declared as `nvmlDeviceGetPciInfo_v3`.\n    #[doc(alias = \"nvmlDeviceGetPciInfo\")]\n    pub unsafe fn device_get_pci_info(\n"
        ));
        assert!(out.contains("nvml_sym(&self.nvml.lib().device_get_pci_info)?;"));
        assert!(out.contains("nvml_sym(&self.nvml.lib().device_get_pci_info_v2)?;"));
    }

    #[test]
    fn alias_revisions_must_agree() {
        let err = generate(
            "fn nvmlDeviceRemoveGpu(pciInfo: *mut nvmlPciInfo_t)\n\
             fn nvmlDeviceRemoveGpu_v2(pciInfo: *mut nvmlPciInfo_t, gpuState: nvmlDetachGpuState_t)\n",
            &block("nvmlDeviceRemoveGpu = nvmlDeviceRemoveGpu_v2\n"),
        )
        .unwrap_err();

        match err {
            GenError::SignatureMismatch { alias, other, .. } => {
                assert_eq!(alias, "nvmlDeviceRemoveGpu");
                assert_eq!(other, "nvmlDeviceRemoveGpu");
            }
            other => panic!("expected a signature mismatch, got {:?}", other),
        }
    }

    #[test]
    fn unknown_alias_target_is_skipped() {
        let out = generate(
            "fn nvmlInit_v2()\n",
            &block("nvmlInit = nvmlInit_v2\nnvmlEventSetWait = nvmlEventSetWait_v2\n"),
        )
        .unwrap();

        assert!(out.contains("pub unsafe fn init(&self)"));
        assert!(!out.contains("event_set_wait"));
    }

    #[test]
    fn alias_cannot_shadow_a_declaration() {
        let err = generate(
            "fn nvmlInit()\nfn nvmlInit_v2()\n",
            &block("nvmlInit = nvmlInit_v2\n"),
        )
        .unwrap_err();

        assert!(matches!(err, GenError::Parse { line: 2, .. }));
    }

    #[test]
    fn long_use_lists_wrap() {
        let items: Vec<String> = (0..12).map(|i| format!("SomeLongTypeName{}", i)).collect();
        let out = use_line("crate::struct_wrappers", &items);

        assert!(out.starts_with("use crate::struct_wrappers::{\n    SomeLongTypeName0,\n"));
        assert!(out.ends_with("    SomeLongTypeName11,\n};"));
        assert_eq!(use_line("crate", &["Nvml".to_owned()]), "use crate::Nvml;");
    }
}
