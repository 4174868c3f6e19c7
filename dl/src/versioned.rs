use crate::Library;

/**
A logical operation and the exported symbols that implement it.

Candidates are ordered oldest to newest and follow the `name`, `name_v2`,
`name_v3`, ... convention. The first candidate is the baseline and is assumed
to exist in every supported library version.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VersionedSymbol {
    pub name: &'static str,
    pub candidates: &'static [&'static str],
}

impl VersionedSymbol {
    /// The oldest revision, active until something newer is found.
    pub fn baseline(&self) -> &'static str {
        self.candidates.first().copied().unwrap_or(self.name)
    }

    /// Whether more than one revision exists.
    pub fn is_versioned(&self) -> bool {
        self.candidates.len() > 1
    }

    /// The newest candidate exported by `lib`, or the baseline.
    pub fn resolve<L: Library + ?Sized>(&self, lib: &L) -> &'static str {
        newest_available(lib, self.candidates).unwrap_or(self.name)
    }
}

/**
Pick the newest of `candidates` that `lib` exports.

Candidates after the baseline are probed oldest to newest and every
successful lookup replaces the previous pick, so the last hit wins without
comparing version numbers. The baseline itself is never probed. Returns
`None` only when `candidates` is empty.
*/
pub fn newest_available<L: Library + ?Sized>(
    lib: &L,
    candidates: &[&'static str],
) -> Option<&'static str> {
    let (&baseline, newer) = candidates.split_first()?;

    Some(newer.iter().fold(baseline, |active, &candidate| {
        if lib.lookup(candidate).is_ok() {
            candidate
        } else {
            active
        }
    }))
}

/// The revision number encoded in a symbol name: `_vN` gives `N`, no suffix gives 1.
pub fn symbol_version(symbol: &str) -> u32 {
    symbol
        .rsplit_once("_v")
        .and_then(|(_, version)| version.parse().ok())
        .unwrap_or(1)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::DlError;
    use std::collections::HashSet;
    use std::ffi::c_void;

    struct Exports(HashSet<&'static str>);

    impl Library for Exports {
        fn open(&mut self) -> Result<(), DlError> {
            Ok(())
        }

        fn close(&mut self) -> Result<(), DlError> {
            Ok(())
        }

        fn symbol(&self, symbol: &str) -> Result<*mut c_void, DlError> {
            if self.0.contains(symbol) {
                Ok(std::ptr::NonNull::<c_void>::dangling().as_ptr())
            } else {
                Err(DlError::SymbolNotFound {
                    symbol: symbol.to_owned(),
                    source: libloading::Error::DlSymUnknown,
                })
            }
        }
    }

    const OP: VersionedSymbol = VersionedSymbol {
        name: "op",
        candidates: &["op", "op_v2", "op_v3"],
    };

    #[test]
    fn newest_exported_candidate_wins() {
        // Every subset of the three candidates.
        for mask in 0u8..8 {
            let exported: HashSet<_> = OP
                .candidates
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << *i) != 0)
                .map(|(_, &c)| c)
                .collect();

            let newest = OP.candidates[1..]
                .iter()
                .rev()
                .find(|c| exported.contains(*c))
                .copied()
                .unwrap_or("op");

            assert_eq!(OP.resolve(&Exports(exported)), newest, "mask {:03b}", mask);
        }
    }

    #[test]
    fn gap_in_versions() {
        let lib = Exports(["op_v3"].into_iter().collect());
        assert_eq!(OP.resolve(&lib), "op_v3");
    }

    #[test]
    fn resolution_is_idempotent() {
        let lib = Exports(["op", "op_v2"].into_iter().collect());
        assert_eq!(OP.resolve(&lib), OP.resolve(&lib));
    }

    #[test]
    fn empty_candidates() {
        let lib = Exports(HashSet::new());
        assert_eq!(newest_available(&lib, &[]), None);
    }

    #[test]
    fn baseline() {
        assert_eq!(OP.baseline(), "op");
        assert!(OP.is_versioned());
    }

    #[test]
    fn versions_from_names() {
        assert_eq!(symbol_version("nvmlInit"), 1);
        assert_eq!(symbol_version("nvmlInit_v2"), 2);
        assert_eq!(symbol_version("nvmlDeviceGetPciInfo_v3"), 3);
        assert_eq!(symbol_version("nvmlDeviceGetNvLinkRemotePciInfo_v2"), 2);
        assert_eq!(symbol_version("nvmlVgpuInstanceGetUUID"), 1);
    }
}
