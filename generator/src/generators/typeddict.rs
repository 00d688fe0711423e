use std::collections::HashMap;

use tracing::{debug, info};

use dt_pb_schema::{
    FieldDescriptor, Label, MessageDescriptor, MessageTable, Ref, Schema, SchemaComponentTable,
};

use super::{
    common::{ComponentVisitor, GeneratorContext},
    map_fields::{is_map_entry, is_map_field, map_entry_fields},
    scalar::{self, WireType, BASE64_ALIAS},
};
use crate::{
    naming::{dotted_name, field_key, qualified_name},
    options::BytesRepr,
    pyast::{Expr, Module, Stmt},
    unparse::unparse,
    Error, Options,
};

const HEADER: &str = "Generated file. Do not edit.";

#[derive(Default)]
struct TypedDictVisitor {
    records: Vec<Stmt>,
}

impl TypedDictVisitor {
    fn new() -> Self {
        Self::default()
    }

    fn wire_type(
        context: &GeneratorContext,
        owner: Ref<MessageDescriptor>,
        field: &FieldDescriptor,
    ) -> Result<&'static WireType, Error> {
        scalar::lookup(field.type_code).ok_or_else(|| Error::UnsupportedWireType {
            message: dotted_name(owner, context.table),
            field: field.name.clone(),
            code: field.type_code,
        })
    }

    /// The declared type of `field`, without cardinality.
    ///
    /// Message targets become quoted forward references, so cycles in the reference graph never
    /// recurse here. The only recursion is into the key and value of a map entry, which may not be
    /// maps themselves.
    fn resolve_type(
        context: &GeneratorContext,
        owner: Ref<MessageDescriptor>,
        field: &FieldDescriptor,
        allow_map: bool,
    ) -> Result<Expr, Error> {
        let Some(target) = field.message_type else {
            let wire = Self::wire_type(context, owner, field)?;
            return Ok(Expr::name(wire.scalar.type_name(context.options.bytes)));
        };

        if context.options.maps_as_containers && is_map_entry(target, context.table) {
            if !allow_map {
                return Err(Error::InconsistentSchema(format!(
                    "field {:?} of map entry {} is itself a map",
                    field.name,
                    dotted_name(owner, context.table)
                )));
            }
            let (key, value) = map_entry_fields(target, context.table)?;
            let key = Self::resolve_type(context, target, key, false)?;
            let value = Self::resolve_type(context, target, value, false)?;
            return Ok(Expr::generic("dict", vec![key, value]));
        }

        Ok(Expr::str(qualified_name(target, context.table)))
    }

    /// The annotation of `field` inside its record: the resolved type, optionally `Annotated`,
    /// wrapped according to cardinality.
    fn resolve_field(
        context: &GeneratorContext,
        owner: Ref<MessageDescriptor>,
        field: &FieldDescriptor,
    ) -> Result<Expr, Error> {
        let wire = Self::wire_type(context, owner, field)?;
        let mut type_ = Self::resolve_type(context, owner, field, true)?;

        if context.options.add_extra_annotations {
            type_ = Expr::generic(
                "Annotated",
                vec![
                    type_,
                    Expr::Int(field.number.into()),
                    Expr::str(wire.name),
                ],
            );
        }

        if context.options.maps_as_containers && is_map_field(field, context.table) {
            return Ok(type_);
        }

        Ok(match field.label {
            Label::Required => type_,
            Label::Optional => Expr::generic("NotRequired", vec![type_]),
            Label::Repeated => Expr::generic("list", vec![type_]),
        })
    }
}

impl ComponentVisitor for TypedDictVisitor {
    type MessageValue = ();
    fn visit_message(
        &mut self,
        context: &GeneratorContext,
        message: Ref<MessageDescriptor>,
    ) -> Result<(), Error> {
        let name = qualified_name(message, context.table);
        debug!(record = %name, "generating record");

        let mut entries = Vec::new();
        for field in &context.table.get(message).fields {
            entries.push(self.visit_field(context, message, field)?);
        }

        self.records.push(Stmt::Assign {
            target: name.clone(),
            value: Expr::call("TypedDict", vec![Expr::str(name), Expr::Dict(entries)]),
        });
        Ok(())
    }

    type FieldValue = (Expr, Expr);
    fn visit_field(
        &mut self,
        context: &GeneratorContext,
        message: Ref<MessageDescriptor>,
        field: &FieldDescriptor,
    ) -> Result<(Expr, Expr), Error> {
        let annotation = Self::resolve_field(context, message, field)?;
        let key = Expr::str(field_key(field, context.options));
        Ok((key, annotation))
    }
}

/// Fails if a message, containing type or field target is missing from `table`, which can only
/// happen for hand-built schemas that mix references from different builders.
fn check_references(schema: &Schema, table: &SchemaComponentTable) -> Result<(), Error> {
    let dangling = |what: String, ref_: Ref<MessageDescriptor>| {
        Error::InconsistentSchema(format!(
            "{what} references {ref_:?}, which is not part of the schema ({} messages)",
            table.message_count()
        ))
    };

    if let Some(missing) = schema
        .message_descriptors
        .iter()
        .find(|message| !table.contains(**message))
    {
        return Err(dangling("the schema".to_string(), *missing));
    }
    for (_, message) in table.iter() {
        if let Some(parent) = message.containing_type.filter(|p| !table.contains(*p)) {
            return Err(dangling(format!("message {}", message.name), parent));
        }
        for field in &message.fields {
            if let Some(target) = field.message_type.filter(|t| !table.contains(*t)) {
                return Err(dangling(
                    format!("field {:?} of message {}", field.name, message.name),
                    target,
                ));
            }
        }
    }
    Ok(())
}

/// Fails if two emitted messages compose to the same declaration name, e.g. `A.BC` and `AB.C`.
fn check_unique_names(
    context: &GeneratorContext,
    messages: &[Ref<MessageDescriptor>],
) -> Result<(), Error> {
    let mut seen = HashMap::with_capacity(messages.len());
    for message in messages.iter().copied() {
        let name = qualified_name(message, context.table);
        if let Some(previous) = seen.insert(name, message) {
            return Err(Error::InconsistentSchema(format!(
                "messages {} and {} both compose to the declaration name {}",
                dotted_name(previous, context.table),
                dotted_name(message, context.table),
                qualified_name(message, context.table),
            )));
        }
    }
    Ok(())
}

fn preamble(options: &Options) -> Vec<Stmt> {
    let mut names = vec!["TypedDict", "NotRequired"];
    if options.bytes == BytesRepr::Base64 {
        names.push("TypeAlias");
    }
    if options.add_extra_annotations {
        names.push("Annotated");
    }

    let mut body = vec![
        Stmt::Comment(HEADER.to_string()),
        Stmt::ImportFrom {
            module: "typing".to_string(),
            names: names.into_iter().map(str::to_string).collect(),
        },
    ];
    if options.bytes == BytesRepr::Base64 {
        body.push(Stmt::AnnAssign {
            target: BASE64_ALIAS.to_string(),
            annotation: Expr::name("TypeAlias"),
            value: Expr::name("str"),
        });
    }
    body
}

/// Generates the `TypedDict` declarations for all messages of `schema`.
///
/// The whole document is built in memory; on error nothing is returned.
pub fn generate(
    schema: &Schema,
    table: &SchemaComponentTable,
    options: &Options,
) -> Result<String, Error> {
    check_references(schema, table)?;

    let context = GeneratorContext::new(table, options);
    let emitted = schema
        .message_descriptors
        .iter()
        .copied()
        .filter(|message| context.is_emitted(*message))
        .collect::<Vec<_>>();
    check_unique_names(&context, &emitted)?;

    let mut visitor = TypedDictVisitor::new();
    for message in emitted.iter().copied() {
        visitor.visit_message(&context, message)?;
    }

    info!(
        records = visitor.records.len(),
        skipped_map_entries = schema.message_descriptors.len() - emitted.len(),
        "generated TypedDict declarations"
    );

    let mut module = Module {
        body: preamble(options),
    };
    module.body.extend(visitor.records);
    Ok(unparse(&module))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dt_pb_schema::SchemaBuilder;
    use pretty_assertions::assert_eq;

    const STRING: i32 = 9;
    const INT32: i32 = 5;
    const BYTES: i32 = 12;
    const GROUP: i32 = 10;

    fn preserve() -> Options {
        Options::new(true)
    }

    fn scalar_field(name: &str, number: i32, code: i32, label: Label) -> FieldDescriptor {
        FieldDescriptor::scalar(name, number, code, label)
    }

    fn person(builder: &mut SchemaBuilder) -> Ref<MessageDescriptor> {
        let person = builder.add_message("Person", None);
        builder.add_field(person, scalar_field("name", 1, STRING, Label::Required));
        builder.add_field(person, scalar_field("age", 2, INT32, Label::Optional));
        builder.add_field(person, scalar_field("tags", 3, STRING, Label::Repeated));
        person
    }

    /// `Team { map<string, Person> members = 1; }`
    fn team_schema() -> (Schema, SchemaComponentTable) {
        let mut builder = SchemaBuilder::new();
        let person = person(&mut builder);
        let team = builder.add_message("Team", None);
        let entry = builder.add_map_entry("MembersEntry", team);
        builder.add_field(entry, scalar_field("key", 1, STRING, Label::Optional));
        builder.add_field(
            entry,
            FieldDescriptor::message("value", 2, Label::Optional, person),
        );
        builder.add_field(
            team,
            FieldDescriptor::message("members", 1, Label::Repeated, entry),
        );
        builder.finish()
    }

    fn run(schema: &(Schema, SchemaComponentTable), options: &Options) -> String {
        generate(&schema.0, &schema.1, options).unwrap()
    }

    #[test]
    fn person_with_default_options() {
        let mut builder = SchemaBuilder::new();
        person(&mut builder);
        let schema = builder.finish();

        let expected = format!(
            r#"# {HEADER}
from typing import TypedDict, NotRequired, TypeAlias

_Base64: TypeAlias = str

Person = TypedDict(
    "Person",
    {{
        "name": str,
        "age": NotRequired[int],
        "tags": list[str],
    }}
)
"#
        );
        assert_eq!(run(&schema, &preserve()), expected);
    }

    #[test]
    fn maps_become_dicts_and_entries_are_skipped() {
        let schema = team_schema();
        let output = run(&schema, &preserve());

        assert!(output.contains(
            r#"Team = TypedDict(
    "Team",
    {
        "members": dict[str, "Person"],
    }
)"#
        ));
        assert!(!output.contains("TeamMembersEntry"));
        assert_eq!(output.matches("= TypedDict(").count(), 2);
    }

    #[test]
    fn maps_as_repeated_entries() {
        let schema = team_schema();
        let options = Options {
            maps_as_containers: false,
            ..preserve()
        };
        let output = run(&schema, &options);

        assert!(output.contains(r#""members": list["TeamMembersEntry"],"#));
        assert!(output.contains(
            r#"TeamMembersEntry = TypedDict(
    "TeamMembersEntry",
    {
        "key": NotRequired[str],
        "value": NotRequired["Person"],
    }
)"#
        ));
        assert_eq!(output.matches("= TypedDict(").count(), 3);
    }

    #[test]
    fn extra_annotations_carry_number_and_wire_name() {
        let schema = team_schema();
        let options = Options {
            add_extra_annotations: true,
            ..preserve()
        };
        let output = run(&schema, &options);

        assert!(output.contains(
            "from typing import TypedDict, NotRequired, TypeAlias, Annotated\n"
        ));
        assert!(output.contains(r#""name": Annotated[str, 1, "string"],"#));
        assert!(output.contains(r#""age": NotRequired[Annotated[int, 2, "int32"]],"#));
        assert!(output.contains(r#""tags": list[Annotated[str, 3, "string"]],"#));
        assert!(output.contains(
            r#""members": Annotated[dict[str, "Person"], 1, "message"],"#
        ));
    }

    #[test]
    fn lower_camel_field_names() {
        let mut builder = SchemaBuilder::new();
        let user = builder.add_message("User", None);
        builder.add_field(user, scalar_field("display_name", 1, STRING, Label::Optional));
        builder.add_field(user, scalar_field("_id", 2, INT32, Label::Optional));
        let schema = builder.finish();

        let output = run(&schema, &Options::new(false));
        assert!(output.contains(r#""displayName": NotRequired[str],"#));
        assert!(output.contains(r#""Id": NotRequired[int],"#));

        let output = run(&schema, &preserve());
        assert!(output.contains(r#""display_name": NotRequired[str],"#));
        assert!(output.contains(r#""_id": NotRequired[int],"#));
    }

    #[test]
    fn raw_bytes_drop_the_alias() {
        let mut builder = SchemaBuilder::new();
        let blob = builder.add_message("Blob", None);
        builder.add_field(blob, scalar_field("data", 1, BYTES, Label::Required));
        let schema = builder.finish();

        let output = run(&schema, &preserve());
        assert!(output.contains(r#""data": _Base64,"#));

        let options = Options {
            bytes: BytesRepr::Raw,
            ..preserve()
        };
        let output = run(&schema, &options);
        assert!(output.contains(r#""data": bytes,"#));
        assert!(output.contains("from typing import TypedDict, NotRequired\n"));
        assert!(!output.contains("_Base64"));
    }

    #[test]
    fn nested_and_recursive_messages_use_forward_references() {
        let mut builder = SchemaBuilder::new();
        let tree = builder.add_message("Tree", None);
        let node = builder.add_message("Node", Some(tree));
        builder.add_field(tree, FieldDescriptor::message("root", 1, Label::Optional, node));
        builder.add_field(
            node,
            FieldDescriptor::message("children", 1, Label::Repeated, node),
        );
        builder.add_field(node, FieldDescriptor::message("tree", 2, Label::Optional, tree));
        let schema = builder.finish();

        let output = run(&schema, &preserve());
        assert!(output.contains(r#""root": NotRequired["TreeNode"],"#));
        assert!(output.contains(r#""children": list["TreeNode"],"#));
        assert!(output.contains(r#""tree": NotRequired["Tree"],"#));
        let tree_at = output.find("Tree = TypedDict(").unwrap();
        let node_at = output.find("TreeNode = TypedDict(").unwrap();
        assert!(tree_at < node_at);
    }

    #[test]
    fn empty_message_has_empty_record() {
        let mut builder = SchemaBuilder::new();
        builder.add_message("Empty", None);
        let schema = builder.finish();

        let output = run(&schema, &preserve());
        assert!(output.ends_with("\n\nEmpty = TypedDict(\"Empty\", {})\n"));
    }

    #[test]
    fn cardinality_wrappers_are_exclusive() {
        for (label, wrapper) in [
            (Label::Required, None),
            (Label::Optional, Some("NotRequired")),
            (Label::Repeated, Some("list")),
        ] {
            let mut builder = SchemaBuilder::new();
            let message = builder.add_message("M", None);
            builder.add_field(message, scalar_field("f", 1, INT32, label));
            let (_, table) = builder.finish();
            let options = preserve();
            let context = GeneratorContext::new(&table, &options);

            let field = &table.get(message).fields[0];
            let annotation = TypedDictVisitor::resolve_field(&context, message, field).unwrap();
            let expected = match wrapper {
                None => Expr::name("int"),
                Some(wrapper) => Expr::generic(wrapper, vec![Expr::name("int")]),
            };
            assert_eq!(annotation, expected, "{label:?}");
        }
    }

    #[test]
    fn every_table_entry_resolves_to_its_scalar() {
        let options = Options {
            bytes: BytesRepr::Raw,
            ..preserve()
        };
        for wire in scalar::WIRE_TYPES {
            let mut builder = SchemaBuilder::new();
            let message = builder.add_message("M", None);
            builder.add_field(message, scalar_field("f", 1, wire.code, Label::Required));
            let (_, table) = builder.finish();
            let context = GeneratorContext::new(&table, &options);

            let field = &table.get(message).fields[0];
            let type_ = TypedDictVisitor::resolve_type(&context, message, field, true).unwrap();
            assert_eq!(type_, Expr::name(wire.scalar.type_name(options.bytes)));
        }
    }

    #[test]
    fn groups_are_unsupported() {
        let mut builder = SchemaBuilder::new();
        let outer = builder.add_message("Outer", None);
        let group = builder.add_message("Result", Some(outer));
        builder.add_field(
            outer,
            FieldDescriptor {
                type_code: GROUP,
                ..FieldDescriptor::message("result", 1, Label::Repeated, group)
            },
        );
        let (schema, table) = builder.finish();

        let err = generate(&schema, &table, &preserve()).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedWireType { ref message, ref field, code: GROUP }
                if message == "Outer" && field == "result"
        ));
    }

    #[test]
    fn map_entry_without_key_is_inconsistent() {
        let mut builder = SchemaBuilder::new();
        let holder = builder.add_message("Holder", None);
        let entry = builder.add_map_entry("ItemsEntry", holder);
        builder.add_field(entry, scalar_field("value", 2, STRING, Label::Optional));
        builder.add_field(
            holder,
            FieldDescriptor::message("items", 1, Label::Repeated, entry),
        );
        let (schema, table) = builder.finish();

        let err = generate(&schema, &table, &preserve()).unwrap_err();
        assert!(matches!(err, Error::InconsistentSchema(_)));

        // Without flattening the entry is an ordinary record
        let options = Options {
            maps_as_containers: false,
            ..preserve()
        };
        assert!(generate(&schema, &table, &options).is_ok());
    }

    #[test]
    fn map_valued_map_entry_is_rejected() {
        let mut builder = SchemaBuilder::new();
        let holder = builder.add_message("Holder", None);
        let entry = builder.add_map_entry("LoopEntry", holder);
        builder.add_field(entry, scalar_field("key", 1, STRING, Label::Optional));
        builder.add_field(
            entry,
            FieldDescriptor::message("value", 2, Label::Optional, entry),
        );
        builder.add_field(
            holder,
            FieldDescriptor::message("loop", 1, Label::Repeated, entry),
        );
        let (schema, table) = builder.finish();

        let err = generate(&schema, &table, &preserve()).unwrap_err();
        assert!(err.to_string().contains("is itself a map"), "{err}");
    }

    #[test]
    fn reference_from_another_builder_is_inconsistent() {
        let mut other = SchemaBuilder::new();
        other.add_message("X", None);
        other.add_message("Y", None);
        let foreign = other.add_message("Z", None);

        let mut builder = SchemaBuilder::new();
        let holder = builder.add_message("Holder", None);
        builder.add_field(
            holder,
            FieldDescriptor::message("z", 1, Label::Optional, foreign),
        );
        let (schema, table) = builder.finish();

        let err = generate(&schema, &table, &preserve()).unwrap_err();
        match err {
            Error::InconsistentSchema(reason) => {
                assert!(reason.starts_with(r#"field "z" of message Holder references"#), "{reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn foreign_schema_list_is_inconsistent() {
        let mut big = SchemaBuilder::new();
        big.add_message("A", None);
        big.add_message("B", None);
        let (schema, _) = big.finish();

        let mut small = SchemaBuilder::new();
        small.add_message("C", None);
        let (_, table) = small.finish();

        assert!(matches!(
            generate(&schema, &table, &preserve()),
            Err(Error::InconsistentSchema(_))
        ));
    }

    #[test]
    fn colliding_names_are_rejected() {
        let mut builder = SchemaBuilder::new();
        let a = builder.add_message("A", None);
        builder.add_message("BC", Some(a));
        let ab = builder.add_message("AB", None);
        builder.add_message("C", Some(ab));
        let (schema, table) = builder.finish();

        let err = generate(&schema, &table, &preserve()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "inconsistent schema: messages A.BC and AB.C both compose to the declaration name ABC"
        );
    }

    #[test]
    fn output_is_deterministic() {
        let schema = team_schema();
        let options = Options {
            add_extra_annotations: true,
            ..Options::new(false)
        };
        let first = run(&schema, &options);
        let second = run(&schema, &options);
        assert_eq!(first, second);
    }
}
