/*!
Parsers for the three declaration files.

All of them are line based, and `#` starts a comment that runs to the end of
the line. Errors carry the file and the 1-based line they were found on.
*/

use std::collections::BTreeMap;
use std::path::Path;

use crate::GenError;

const BEGIN_ALIASES: &str = "BEGIN_UNVERSIONED_FUNCTIONS";
const END_ALIASES: &str = "END_UNVERSIONED_FUNCTIONS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    /// A handle with an `XApi` trait, exported from the crate root.
    Interface,
    /// An interface whose value frees itself on drop. `release` is the entry
    /// point that frees it, whose wrapper consumes the value.
    Owned { release: String },
    /// A value built from its raw struct once NVML has filled it.
    Convert,
    /// A wrapper NVML writes into directly through the named field.
    Decorated { field: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub public: String,
    pub kind: TypeKind,
}

impl TypeDecl {
    /// The C type this public type wraps.
    pub fn raw(&self) -> String {
        format!("nvml{}_t", self.public)
    }

    /// Whether this is a handle passed through its `XApi` trait.
    pub fn is_handle(&self) -> bool {
        matches!(self.kind, TypeKind::Interface | TypeKind::Owned { .. })
    }
}

/// Registered public types, keyed by raw C type.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    by_raw: BTreeMap<String, TypeDecl>,
}

impl TypeRegistry {
    pub fn get(&self, raw: &str) -> Option<&TypeDecl> {
        self.by_raw.get(raw)
    }

    pub fn len(&self) -> usize {
        self.by_raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_raw.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub ty: String,
    /// The parameter holding this buffer's length, from a trailing `[len]`.
    pub len: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub symbol: String,
    pub params: Vec<Param>,
    pub ret: Option<String>,
    /// Line the declaration starts on.
    pub line: usize,
}

impl Function {
    /// Whether this returns an `nvmlReturn_t` status, the only kind of entry
    /// point that gets a wrapper.
    pub fn returns_status(&self) -> bool {
        matches!(self.ret.as_deref(), None | Some("nvmlReturn_t"))
    }

    pub fn param_types(&self) -> Vec<&str> {
        self.params.iter().map(|p| p.ty.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub name: String,
    pub target: String,
    pub line: usize,
}

/**
Parse `types.idl`.

```text
interface Device
owned EventSet { nvmlEventSetFree }
convert GpuInstanceInfo
decorated VgpuMetadata { raw }
```
*/
pub fn parse_types(file: &Path, text: &str) -> Result<TypeRegistry, GenError> {
    let mut registry = TypeRegistry::default();

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = strip_comment(line).trim();
        if line.is_empty() {
            continue;
        }

        let (keyword, rest) = line
            .split_once(char::is_whitespace)
            .ok_or_else(|| parse_error(file, line_no, "expected `<kind> <Name>`"))?;
        let rest = rest.trim();

        let decl = match keyword {
            "interface" | "convert" => {
                check_ident(file, line_no, rest)?;
                let kind = if keyword == "interface" {
                    TypeKind::Interface
                } else {
                    TypeKind::Convert
                };

                TypeDecl {
                    public: rest.to_owned(),
                    kind,
                }
            }
            "decorated" | "owned" => {
                let malformed = || {
                    parse_error(
                        file,
                        line_no,
                        format!("expected `{} <Name> {{ <ident> }}`", keyword),
                    )
                };
                let (name, body) = rest.split_once('{').ok_or_else(malformed)?;
                let inner = body.trim().strip_suffix('}').ok_or_else(malformed)?.trim();
                let name = name.trim();
                check_ident(file, line_no, name)?;
                check_ident(file, line_no, inner)?;

                let kind = if keyword == "owned" {
                    TypeKind::Owned {
                        release: inner.to_owned(),
                    }
                } else {
                    TypeKind::Decorated {
                        field: inner.to_owned(),
                    }
                };

                TypeDecl {
                    public: name.to_owned(),
                    kind,
                }
            }
            other => {
                return Err(parse_error(
                    file,
                    line_no,
                    format!("unknown type kind `{}`", other),
                ))
            }
        };

        let raw = decl.raw();
        if registry.by_raw.contains_key(&raw) {
            return Err(parse_error(
                file,
                line_no,
                format!("`{}` is registered twice", decl.public),
            ));
        }
        registry.by_raw.insert(raw, decl);
    }

    Ok(registry)
}

/**
Parse `entry_points.idl`.

A declaration may span several lines; it ends where its parentheses balance.

```text
fn nvmlDeviceGetName(device: nvmlDevice_t, name: *mut c_char [length], length: c_uint)
fn nvmlErrorString(result: nvmlReturn_t) -> *const c_char
```
*/
pub fn parse_entry_points(file: &Path, text: &str) -> Result<Vec<Function>, GenError> {
    let mut functions = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (index, line) in text.lines().enumerate() {
        let line = strip_comment(line).trim();
        if line.is_empty() {
            continue;
        }

        let (start, decl) = match pending.take() {
            Some((start, mut decl)) => {
                decl.push(' ');
                decl.push_str(line);
                (start, decl)
            }
            None => {
                if !line.starts_with("fn ") {
                    return Err(parse_error(file, index + 1, "expected `fn`"));
                }
                (index + 1, line.to_owned())
            }
        };

        if is_complete(&decl) {
            functions.push(parse_function(file, start, &decl)?);
        } else {
            pending = Some((start, decl));
        }
    }

    if let Some((start, _)) = pending {
        return Err(parse_error(file, start, "unterminated declaration"));
    }

    Ok(functions)
}

/**
Parse the unversioned block of `aliases.idl`.

Only lines between `BEGIN_UNVERSIONED_FUNCTIONS` and
`END_UNVERSIONED_FUNCTIONS` are read, each of them `alias = target`.
*/
pub fn parse_aliases(file: &Path, text: &str) -> Result<Vec<Alias>, GenError> {
    let mut aliases = Vec::new();
    let mut begin: Option<usize> = None;

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = strip_comment(line).trim();

        match (line, begin) {
            (BEGIN_ALIASES, Some(_)) => {
                return Err(parse_error(file, line_no, "nested alias block"));
            }
            (BEGIN_ALIASES, None) => {
                begin = Some(line_no);
                continue;
            }
            (END_ALIASES, None) => {
                return Err(parse_error(
                    file,
                    line_no,
                    format!("{} without {}", END_ALIASES, BEGIN_ALIASES),
                ));
            }
            (END_ALIASES, Some(_)) => {
                begin = None;
                continue;
            }
            (_, None) => continue,
            ("", Some(_)) => continue,
            (_, Some(_)) => {}
        }

        let (name, target) = line
            .split_once('=')
            .ok_or_else(|| parse_error(file, line_no, "expected `alias = target`"))?;
        let (name, target) = (name.trim(), target.trim());
        check_ident(file, line_no, name)?;
        check_ident(file, line_no, target)?;

        aliases.push(Alias {
            name: name.to_owned(),
            target: target.to_owned(),
            line: line_no,
        });
    }

    if let Some(start) = begin {
        return Err(parse_error(file, start, format!("missing {}", END_ALIASES)));
    }

    Ok(aliases)
}

pub(crate) fn parse_error(file: &Path, line: usize, message: impl Into<String>) -> GenError {
    GenError::Parse {
        file: file.to_owned(),
        line,
        message: message.into(),
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(at) => &line[..at],
        None => line,
    }
}

fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn check_ident(file: &Path, line: usize, s: &str) -> Result<(), GenError> {
    if is_ident(s) {
        Ok(())
    } else {
        Err(parse_error(file, line, format!("`{}` is not an identifier", s)))
    }
}

fn is_complete(decl: &str) -> bool {
    let opened = decl.matches('(').count();
    opened > 0 && opened == decl.matches(')').count()
}

/// Collapse runs of whitespace so `*mut  c_uint` and `*mut c_uint` compare equal.
fn normalize_type(ty: &str) -> String {
    ty.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_function(file: &Path, line: usize, decl: &str) -> Result<Function, GenError> {
    let body = decl.trim_start_matches("fn").trim_start();
    let (open, close) = match (body.find('('), body.rfind(')')) {
        (Some(open), Some(close)) if open < close => (open, close),
        _ => return Err(parse_error(file, line, "expected `fn name(...)`")),
    };

    let symbol = body[..open].trim();
    check_ident(file, line, symbol)?;

    let mut params: Vec<Param> = Vec::new();
    for piece in body[open + 1..close].split(',') {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }

        let param = parse_param(file, line, piece)?;
        if params.iter().any(|p| p.name == param.name) {
            return Err(parse_error(
                file,
                line,
                format!("`{}` declares `{}` twice", symbol, param.name),
            ));
        }
        params.push(param);
    }

    for len in params.iter().filter_map(|p| p.len.as_deref()) {
        if !params.iter().any(|p| p.name == len) {
            return Err(parse_error(
                file,
                line,
                format!("`[{}]` names no parameter of `{}`", len, symbol),
            ));
        }
    }

    let tail = body[close + 1..].trim();
    let ret = if tail.is_empty() {
        None
    } else {
        let ty = tail
            .strip_prefix("->")
            .map(normalize_type)
            .filter(|ty| !ty.is_empty())
            .ok_or_else(|| parse_error(file, line, "expected `-> <type>`"))?;
        Some(ty)
    };

    Ok(Function {
        symbol: symbol.to_owned(),
        params,
        ret,
        line,
    })
}

fn parse_param(file: &Path, line: usize, piece: &str) -> Result<Param, GenError> {
    let (name, ty) = piece
        .split_once(':')
        .ok_or_else(|| parse_error(file, line, format!("expected `name: type`, found `{}`", piece)))?;
    let name = name.trim();
    check_ident(file, line, name)?;

    let ty = ty.trim();
    let (ty, len) = match ty.strip_suffix(']') {
        Some(head) => {
            let open = head
                .rfind('[')
                .ok_or_else(|| parse_error(file, line, format!("unbalanced `]` in `{}`", piece)))?;
            let len = head[open + 1..].trim();
            check_ident(file, line, len)?;
            (head[..open].trim(), Some(len.to_owned()))
        }
        None => (ty, None),
    };

    if ty.is_empty() {
        return Err(parse_error(file, line, format!("`{}` has no type", name)));
    }

    Ok(Param {
        name: name.to_owned(),
        ty: normalize_type(ty),
        len,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    fn file() -> &'static Path {
        Path::new("test.idl")
    }

    fn parse_line(err: GenError) -> usize {
        match err {
            GenError::Parse { line, .. } => line,
            other => panic!("expected a parse error, got {:?}", other),
        }
    }

    #[test]
    fn types_by_raw_name() {
        let types = parse_types(
            file(),
            "# handles\ninterface Device\nconvert EventData\n\ndecorated VgpuMetadata { raw }\n",
        )
        .unwrap();

        assert_eq!(types.len(), 3);
        assert_eq!(types.get("nvmlDevice_t").unwrap().kind, TypeKind::Interface);
        assert_eq!(types.get("nvmlEventData_t").unwrap().public, "EventData");
        assert_eq!(
            types.get("nvmlVgpuMetadata_t").unwrap().kind,
            TypeKind::Decorated {
                field: "raw".into()
            }
        );
        assert!(types.get("Device").is_none());
    }

    #[test]
    fn owned_handles_name_their_release() {
        let types = parse_types(file(), "owned GpmSample { nvmlGpmSampleFree }\n").unwrap();
        let decl = types.get("nvmlGpmSample_t").unwrap();

        assert!(decl.is_handle());
        assert_eq!(
            decl.kind,
            TypeKind::Owned {
                release: "nvmlGpmSampleFree".into()
            }
        );

        let err = parse_types(file(), "interface Device\nowned EventSet\n").unwrap_err();
        assert_eq!(parse_line(err), 2);
    }

    #[test]
    fn unknown_type_kind_reports_its_line() {
        let err = parse_types(file(), "interface Device\n\nstruct Memory\n").unwrap_err();
        assert_eq!(parse_line(err), 3);
    }

    #[test]
    fn duplicate_type() {
        let err = parse_types(file(), "interface Unit\nconvert Unit\n").unwrap_err();
        assert_eq!(parse_line(err), 2);
    }

    #[test]
    fn declarations_span_lines() {
        let functions = parse_entry_points(
            file(),
            "fn nvmlShutdown()\n\
             # a comment between declarations\n\
             fn nvmlUnitGetDevices(\n    unit: nvmlUnit_t,\n    deviceCount: *mut   c_uint,\n    \
             devices: *mut nvmlDevice_t [deviceCount],\n)\n\
             fn nvmlErrorString(result: nvmlReturn_t) -> *const c_char\n",
        )
        .unwrap();

        assert_eq!(functions.len(), 3);
        assert!(functions[0].params.is_empty());
        assert!(functions[0].returns_status());

        let devices = &functions[1];
        assert_eq!(devices.line, 3);
        assert_eq!(
            devices.param_types(),
            vec!["nvmlUnit_t", "*mut c_uint", "*mut nvmlDevice_t"]
        );
        assert_eq!(devices.params[2].len.as_deref(), Some("deviceCount"));

        assert_eq!(functions[2].ret.as_deref(), Some("*const c_char"));
        assert!(!functions[2].returns_status());
    }

    #[test]
    fn length_must_name_a_parameter() {
        let err = parse_entry_points(
            file(),
            "fn nvmlInit_v2()\nfn nvmlDeviceGetName(device: nvmlDevice_t, name: *mut c_char [len])\n",
        )
        .unwrap_err();
        assert_eq!(parse_line(err), 2);
    }

    #[test]
    fn unterminated_declaration() {
        let err = parse_entry_points(file(), "fn nvmlInit_v2()\n\nfn nvmlShutdown(\n").unwrap_err();
        assert_eq!(parse_line(err), 3);
    }

    #[test]
    fn missing_fn_keyword() {
        let err = parse_entry_points(file(), "nvmlShutdown()\n").unwrap_err();
        assert_eq!(parse_line(err), 1);
    }

    #[test]
    fn only_the_unversioned_block_is_read() {
        let aliases = parse_aliases(
            file(),
            "nvmlIgnored = nvmlIgnored_v2\n\
             BEGIN_UNVERSIONED_FUNCTIONS\n\
             nvmlInit = nvmlInit_v2 # trailing comment\n\
             \n\
             nvmlEventSetWait = nvmlEventSetWait_v2\n\
             END_UNVERSIONED_FUNCTIONS\n\
             nvmlAfter = nvmlAfter_v2\n",
        )
        .unwrap();

        assert_eq!(
            aliases,
            vec![
                Alias {
                    name: "nvmlInit".into(),
                    target: "nvmlInit_v2".into(),
                    line: 3,
                },
                Alias {
                    name: "nvmlEventSetWait".into(),
                    target: "nvmlEventSetWait_v2".into(),
                    line: 5,
                },
            ]
        );
    }

    #[test]
    fn unclosed_alias_block() {
        let err = parse_aliases(file(), "\nBEGIN_UNVERSIONED_FUNCTIONS\nnvmlInit = nvmlInit_v2\n")
            .unwrap_err();
        assert_eq!(parse_line(err), 2);
    }
}
