//! Single-pass VCD hierarchy builder.
//!
//! Consumes the tokenizer's command stream once, in order, and produces a
//! [`Waveform`]: the scope tree, the flat variable table, and the header
//! metadata. Value changes are accumulated per identifier code during the
//! pass and attached to the declared variables in a resolution step after
//! the stream is exhausted, so variables sharing a code end up with the
//! same shared sequence.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::sync::Arc;

use vcd::{Command, IdCode, Parser, ScopeType};

use crate::error::LoadError;
use crate::hierarchy::{
    ChangeValue, Metadata, Scope, ScopeId, ValueChange, VarId, Variable, Waveform,
};

/// Loads a VCD trace from a filesystem path.
///
/// Opens the file, wraps it in a `BufReader`, and feeds the tokenizer's
/// command stream through [`load_tokens`]. The file handle lives only for
/// the duration of the call.
///
/// # Errors
///
/// Returns [`LoadError::Io`] when the file cannot be opened or the stream
/// is malformed, and [`LoadError::UnbalancedUpscope`] on unbalanced scope
/// nesting.
pub fn load_file(path: &Path) -> Result<Waveform, LoadError> {
    let file = File::open(path)?;
    let parser = Parser::new(BufReader::new(file));
    load_tokens(parser)
}

/// Loads a VCD trace from an already-tokenized command stream.
///
/// Accepts any source of `io::Result<Command>` items, which lets tests
/// feed synthetic token sequences without a backing file. The stream is
/// consumed exactly once, in order; an `Err` item aborts the whole load
/// and discards everything built so far.
///
/// # Errors
///
/// Same as [`load_file`], minus the open failure.
pub fn load_tokens<I>(tokens: I) -> Result<Waveform, LoadError>
where
    I: IntoIterator<Item = io::Result<Command>>,
{
    let mut builder = HierarchyBuilder::new();
    for token in tokens {
        builder.command(token?)?;
    }
    Ok(builder.finish())
}

/// Mutable cursor state for one build pass.
///
/// Owned exclusively by the builder and discarded once the variable table
/// is resolved; nothing in here escapes into the returned [`Waveform`].
struct ParseState {
    /// The scope new declarations attach to.
    current: ScopeId,
    /// Simulation time of the last `#<time>` token.
    time: u64,
    /// Per-identifier-code change accumulator.
    pending: HashMap<IdCode, Vec<ValueChange>>,
}

/// Builds the scope tree and variable table from the command stream.
struct HierarchyBuilder {
    metadata: Metadata,
    scopes: Vec<Scope>,
    variables: Vec<Variable>,
    state: ParseState,
}

impl HierarchyBuilder {
    fn new() -> Self {
        let root = Scope {
            name: "root".to_string(),
            scope_type: ScopeType::Module,
            parent: None,
            children: Vec::new(),
            variables: Vec::new(),
        };
        Self {
            metadata: Metadata::default(),
            scopes: vec![root],
            variables: Vec::new(),
            state: ParseState {
                current: ScopeId::from_raw(0),
                time: 0,
                pending: HashMap::new(),
            },
        }
    }

    /// Applies one command to the build state.
    fn command(&mut self, command: Command) -> Result<(), LoadError> {
        match command {
            Command::Comment(text) => append_text(&mut self.metadata.comment, &text),
            Command::Date(text) => append_text(&mut self.metadata.date, &text),
            Command::Version(text) => append_text(&mut self.metadata.version, &text),
            Command::Timescale(n, unit) => {
                self.metadata.timescale = Some(format!("{n} {unit}"));
            }
            Command::ScopeDef(scope_type, name) => {
                let id = ScopeId::from_raw(self.scopes.len() as u32);
                self.scopes.push(Scope {
                    name,
                    scope_type,
                    parent: Some(self.state.current),
                    children: Vec::new(),
                    variables: Vec::new(),
                });
                self.current_scope_mut().children.push(id);
                self.state.current = id;
            }
            Command::Upscope => {
                let current = self.state.current.as_raw() as usize;
                self.state.current =
                    self.scopes[current].parent.ok_or(LoadError::UnbalancedUpscope)?;
            }
            Command::VarDef(var_type, width, id_code, reference, index) => {
                let id = VarId::from_raw(self.variables.len() as u32);
                self.variables.push(Variable {
                    var_type,
                    width,
                    id_code,
                    reference,
                    index,
                    changes: Arc::new([]),
                });
                self.current_scope_mut().variables.push(id);
            }
            Command::Timestamp(time) => self.state.time = time,
            Command::ChangeScalar(code, value) => self.record(code, ChangeValue::Scalar(value)),
            Command::ChangeVector(code, value) => self.record(code, ChangeValue::Vector(value)),
            Command::ChangeReal(code, value) => self.record(code, ChangeValue::Real(value)),
            Command::ChangeString(code, value) => self.record(code, ChangeValue::String(value)),
            // $enddefinitions and the dump-control blocks delimit sections
            // of the source format but carry no model state.
            Command::Enddefinitions | Command::Begin(_) | Command::End(_) => {}
            // Tolerate commands this model has no use for.
            _ => {}
        }
        Ok(())
    }

    fn record(&mut self, code: IdCode, value: ChangeValue) {
        self.state.pending.entry(code).or_default().push(ValueChange {
            time: self.state.time,
            value,
        });
    }

    fn current_scope_mut(&mut self) -> &mut Scope {
        // The current id always points into the arena: it starts at the
        // root and is only ever replaced by freshly pushed ids or parents.
        &mut self.scopes[self.state.current.as_raw() as usize]
    }

    /// Resolution phase: attaches each accumulated change sequence to every
    /// variable declaring its identifier code.
    ///
    /// Sequences are shared, not copied: variables with the same code hold
    /// clones of one `Arc`. Changes for codes no variable declared are
    /// dropped here. Variables whose code never changed get an empty
    /// shared sequence.
    fn finish(mut self) -> Waveform {
        let resolved: HashMap<IdCode, Arc<[ValueChange]>> = self
            .state
            .pending
            .drain()
            .map(|(code, changes)| (code, Arc::from(changes)))
            .collect();
        let empty: Arc<[ValueChange]> = Arc::new([]);
        for var in &mut self.variables {
            var.changes = resolved
                .get(&var.id_code)
                .cloned()
                .unwrap_or_else(|| Arc::clone(&empty));
        }
        Waveform {
            metadata: self.metadata,
            scopes: self.scopes,
            root: ScopeId::from_raw(0),
            variables: self.variables,
        }
    }
}

/// Appends one declaration command's text to a metadata slot.
///
/// Trailing whitespace from the command body is dropped; repeated commands
/// of the same kind accumulate line-wise.
fn append_text(slot: &mut Option<String>, text: &str) {
    let text = text.trim_end();
    match slot {
        Some(existing) => {
            existing.push('\n');
            existing.push_str(text);
        }
        None => *slot = Some(text.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use vcd::{ReferenceIndex, TimescaleUnit, Value, VarType};

    fn id(code: &str) -> IdCode {
        code.parse().unwrap()
    }

    fn vector(bits: &str) -> vcd::Vector {
        bits.chars()
            .map(|c| match c {
                '0' => Value::V0,
                '1' => Value::V1,
                'z' | 'Z' => Value::Z,
                _ => Value::X,
            })
            .collect::<Vec<Value>>()
            .into()
    }

    fn load(commands: Vec<Command>) -> Result<Waveform, LoadError> {
        load_tokens(commands.into_iter().map(Ok))
    }

    fn scope_def(name: &str) -> Command {
        Command::ScopeDef(ScopeType::Module, name.to_string())
    }

    fn var_def(var_type: VarType, width: u32, code: &str, reference: &str) -> Command {
        Command::VarDef(var_type, width, id(code), reference.to_string(), None)
    }

    #[test]
    fn end_to_end_scenario() {
        let wave = load(vec![
            scope_def("top"),
            var_def(VarType::Wire, 1, "!", "clk"),
            scope_def("core"),
            var_def(VarType::Reg, 8, "#", "counter"),
            Command::Upscope,
            Command::Upscope,
            Command::Enddefinitions,
            Command::Timestamp(10),
            Command::ChangeScalar(id("!"), Value::V1),
            Command::Timestamp(20),
            Command::ChangeVector(id("#"), vector("00001010")),
        ])
        .unwrap();

        let root = wave.scope(wave.root).unwrap();
        assert_eq!(root.children.len(), 1);

        let top = wave.scope(root.children[0]).unwrap();
        assert_eq!(top.name, "top");
        assert_eq!(wave.full_path(root.children[0]), "top");
        assert_eq!(top.variables.len(), 1);
        assert_eq!(top.children.len(), 1);

        let clk = wave.variable(top.variables[0]).unwrap();
        assert_eq!(clk.reference, "clk");
        assert_eq!(clk.changes.len(), 1);
        assert_eq!(clk.changes[0].time, 10);
        assert_eq!(clk.changes[0].value.to_string(), "1");

        let core_id = top.children[0];
        assert_eq!(wave.full_path(core_id), "top.core");
        let core = wave.scope(core_id).unwrap();
        let counter = wave.variable(core.variables[0]).unwrap();
        assert_eq!(counter.reference, "counter");
        assert_eq!(counter.width, 8);
        assert_eq!(counter.changes.len(), 1);
        assert_eq!(counter.changes[0].time, 20);
        assert_eq!(counter.changes[0].value.to_string(), "00001010");
    }

    #[test]
    fn aliased_codes_share_one_sequence() {
        let wave = load(vec![
            scope_def("top"),
            var_def(VarType::Wire, 1, "!", "a"),
            scope_def("inner"),
            var_def(VarType::Wire, 1, "!", "a_alias"),
            Command::Upscope,
            Command::Upscope,
            Command::Enddefinitions,
            Command::Timestamp(5),
            Command::ChangeScalar(id("!"), Value::V0),
        ])
        .unwrap();

        assert_eq!(wave.variables.len(), 2);
        let a = &wave.variables[0];
        let alias = &wave.variables[1];
        assert_eq!(a.changes.len(), 1);
        assert!(Arc::ptr_eq(&a.changes, &alias.changes));
    }

    #[test]
    fn change_times_preserve_order_with_duplicates() {
        let mut commands = vec![
            scope_def("top"),
            var_def(VarType::Wire, 1, "!", "sig"),
            Command::Upscope,
            Command::Enddefinitions,
        ];
        for time in [0, 0, 5, 5, 10] {
            commands.push(Command::Timestamp(time));
            commands.push(Command::ChangeScalar(id("!"), Value::V1));
        }
        let wave = load(commands).unwrap();
        let times: Vec<u64> = wave.variables[0].changes.iter().map(|c| c.time).collect();
        assert_eq!(times, [0, 0, 5, 5, 10]);
    }

    #[test]
    fn no_vars_yields_root_only() {
        let wave = load(vec![
            Command::Date("today".to_string()),
            Command::Enddefinitions,
        ])
        .unwrap();
        assert_eq!(wave.scopes.len(), 1);
        assert!(wave.scope(wave.root).unwrap().children.is_empty());
        assert!(wave.variables.is_empty());
        assert_eq!(wave.metadata.date.as_deref(), Some("today"));
        assert!(wave.metadata.comment.is_none());
        assert!(wave.metadata.version.is_none());
        assert!(wave.metadata.timescale.is_none());
    }

    #[test]
    fn upscope_at_root_is_structural_error() {
        let result = load(vec![Command::Upscope]);
        assert!(matches!(result, Err(LoadError::UnbalancedUpscope)));
    }

    #[test]
    fn upscope_at_root_after_balanced_nesting() {
        let result = load(vec![scope_def("top"), Command::Upscope, Command::Upscope]);
        assert!(matches!(result, Err(LoadError::UnbalancedUpscope)));
    }

    #[test]
    fn sibling_scopes_keep_declaration_order() {
        let wave = load(vec![
            scope_def("top"),
            scope_def("a"),
            Command::Upscope,
            scope_def("b"),
            Command::Upscope,
            Command::Upscope,
        ])
        .unwrap();
        let root = wave.scope(wave.root).unwrap();
        let top = wave.scope(root.children[0]).unwrap();
        let names: Vec<&str> = top
            .children
            .iter()
            .map(|&c| wave.scope(c).unwrap().name.as_str())
            .collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(wave.full_path(top.children[1]), "top.b");
    }

    #[test]
    fn change_for_undeclared_code_is_dropped() {
        let wave = load(vec![
            scope_def("top"),
            var_def(VarType::Wire, 1, "!", "sig"),
            Command::Upscope,
            Command::Enddefinitions,
            Command::Timestamp(1),
            Command::ChangeScalar(id("z"), Value::V1),
        ])
        .unwrap();
        assert!(wave.variables[0].changes.is_empty());
    }

    #[test]
    fn variable_without_changes_gets_empty_sequence() {
        let wave = load(vec![
            scope_def("top"),
            var_def(VarType::Wire, 1, "!", "quiet"),
            Command::Upscope,
            Command::Enddefinitions,
        ])
        .unwrap();
        assert!(wave.variables[0].changes.is_empty());
    }

    #[test]
    fn metadata_appends_repeated_commands() {
        let wave = load(vec![
            Command::Comment("first \n".to_string()),
            Command::Comment("second".to_string()),
            Command::Version("sim v1".to_string()),
            Command::Timescale(10, TimescaleUnit::NS),
        ])
        .unwrap();
        assert_eq!(wave.metadata.comment.as_deref(), Some("first\nsecond"));
        assert_eq!(wave.metadata.version.as_deref(), Some("sim v1"));
        assert_eq!(wave.metadata.timescale.as_deref(), Some("10 ns"));
    }

    #[test]
    fn real_and_string_changes_stored_verbatim() {
        let wave = load(vec![
            scope_def("top"),
            var_def(VarType::Real, 64, "!", "temperature"),
            var_def(VarType::String, 1, "#", "state"),
            Command::Upscope,
            Command::Enddefinitions,
            Command::Timestamp(3),
            Command::ChangeReal(id("!"), 2.5),
            Command::ChangeString(id("#"), "running".to_string()),
        ])
        .unwrap();
        assert!(matches!(
            &wave.variables[0].changes[0].value,
            ChangeValue::Real(v) if *v == 2.5
        ));
        assert!(matches!(
            &wave.variables[1].changes[0].value,
            ChangeValue::String(s) if s == "running"
        ));
    }

    #[test]
    fn bit_index_preserved_from_declaration() {
        let wave = load(vec![
            scope_def("top"),
            Command::VarDef(
                VarType::Wire,
                1,
                id("!"),
                "bus".to_string(),
                Some(ReferenceIndex::BitSelect(3)),
            ),
            Command::Upscope,
        ])
        .unwrap();
        assert!(matches!(
            wave.variables[0].index,
            Some(ReferenceIndex::BitSelect(3))
        ));
    }

    #[test]
    fn dump_control_blocks_are_noops() {
        let wave = load(vec![
            scope_def("top"),
            var_def(VarType::Wire, 1, "!", "sig"),
            Command::Upscope,
            Command::Enddefinitions,
            Command::Begin(vcd::SimulationCommand::Dumpvars),
            Command::ChangeScalar(id("!"), Value::V0),
            Command::End(vcd::SimulationCommand::Dumpvars),
            Command::Timestamp(7),
            Command::ChangeScalar(id("!"), Value::V1),
        ])
        .unwrap();
        let changes = &wave.variables[0].changes;
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].time, 0);
        assert_eq!(changes[1].time, 7);
    }

    #[test]
    fn stream_error_aborts_load() {
        let tokens: Vec<io::Result<Command>> = vec![
            Ok(scope_def("top")),
            Err(io::Error::new(io::ErrorKind::InvalidData, "bad token")),
            Ok(Command::Upscope),
        ];
        let result = load_tokens(tokens);
        assert!(matches!(result, Err(LoadError::Io(_))));
    }

    #[test]
    fn load_file_not_found() {
        let result = load_file(Path::new("/nonexistent/trace.vcd"));
        match result {
            Err(LoadError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
            other => panic!("expected I/O error, got {other:?}"),
        }
    }

    #[test]
    fn load_file_end_to_end() {
        let text = "\
$date today $end
$version wavescope test $end
$timescale 1 ns $end
$scope module top $end
$var wire 1 ! clk $end
$scope module core $end
$var reg 8 \" counter $end
$upscope $end
$upscope $end
$enddefinitions $end
#0
$dumpvars
0!
b00000000 \"
$end
#10
1!
b00001010 \"
";
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();

        let wave = load_file(file.path()).unwrap();
        assert_eq!(wave.metadata.timescale.as_deref(), Some("1 ns"));
        assert_eq!(wave.variables.len(), 2);
        assert_eq!(wave.variables[0].reference, "clk");
        assert_eq!(wave.variables[1].reference, "counter");

        let core = wave.find_scope("top.core").unwrap();
        assert_eq!(wave.scope(core).unwrap().variables.len(), 1);

        let clk = &wave.variables[0];
        assert_eq!(clk.changes.len(), 2);
        assert_eq!(clk.changes[0].time, 0);
        assert_eq!(clk.changes[0].value.to_string(), "0");
        assert_eq!(clk.changes[1].time, 10);
        assert_eq!(clk.changes[1].value.to_string(), "1");

        let counter = &wave.variables[1];
        assert_eq!(counter.changes[1].value.to_string(), "00001010");
    }
}
