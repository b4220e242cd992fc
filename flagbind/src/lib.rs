/*!
A declarative command-line flag binder. Describe your configuration as a
struct, `#[derive(Record)]` it, and `flagbind` fills its fields in from the
command line, handing back whatever positional arguments are left over.

```
use flagbind::{Record, Settings, try_parse};

/// Greet someone.
#[derive(Record, Default)]
struct Options {
    /// Who to greet
    #[flagbind(alias = "n")]
    name: String,

    #[flagbind(alias = "v")]
    verbose: bool,

    times: u32,
}

let mut options = Options::default();
let tokens = ["-v", "--name", "Jack", "--times=3", "play", "--loud"];
let rest = try_parse(&tokens, &mut options, &Settings::new("greet")).unwrap();

assert_eq!(options.name, "Jack");
assert!(options.verbose);
assert_eq!(options.times, 3);
assert_eq!(rest, ["play", "--loud"]);
```

Flags are matched case-insensitively by their primary name (the field name,
split into dashed words: `dry_run` and `DryRun` are both `--dry-run`) or by
their alias. Boolean flags can be clustered (`-vd`). Values may be given
inline (`--name=Jack`) or as the following token, which is taken verbatim
even if it starts with a dash (`--temperature -10`). By default the first
positional argument stops flag processing; everything after it is returned
as-is.

Field types are `bool`, the integer and float primitives, `String`, any type
implementing [`Convertible`], and `Vec`s of those (other than `bool`), which
collect every occurrence of their flag. `#[derive(Convertible)]` covers
newtypes and enums, whose variants are matched by their kebab-case names.
*/

pub mod arguments;
pub mod binder;
pub mod errors;
pub mod from_args;
pub mod help;
mod impls;
pub mod record;
pub mod registry;
pub mod settings;
pub mod util;

pub use arguments::LoadedArguments;
pub use errors::{Error, UnknownVariant, ValueError};
pub use flagbind_derive::{Convertible, Record};
pub use from_args::{parse_or_exit, try_parse};
pub use record::{Binding, Convertible, Element, FieldDescriptor, Fields, Kind, Record};
pub use registry::{Registry, Slot, decompose_name};
pub use settings::Settings;

#[doc(hidden)]
pub mod __private {
    pub use crate::record::probe::*;
}
