//! Renders the schema as an entity relationship diagram, in Graphviz DOT.
//!
//! Every entity becomes a table-shaped node listing its columns. Foreign keys
//! become edges from the referencing column to the referenced table, labelled
//! with the relationship name and cardinality. Optional references are drawn
//! dashed. Many to many relationships get a single bold edge between the two
//! entities, naming the association table they go through.

use std::{collections::BTreeSet, fmt::Write, io, path::Path};

use log::*;

use crate::schema::{
	Cardinality, CheckConstraint, EntityDescriptor, FieldDescriptor, RelationshipKind, Schema,
};


pub fn render(schema: &Schema) -> String {
	let mut dot = String::from("digraph schema {\n");
	dot += "\tgraph [rankdir=LR, fontname=\"Helvetica\"];\n";
	dot += "\tnode [shape=plaintext, fontname=\"Helvetica\"];\n";
	dot += "\tedge [fontname=\"Helvetica\", fontsize=10];\n\n";

	for entity in schema.entities() {
		render_node(&mut dot, entity);
	}
	dot += "\n";
	for edge in schema.edges() {
		let label = match edge.cardinality {
			Cardinality::ManyToOne => "N:1",
			Cardinality::OneToOne => "1:1",
		};
		let label = match edge.from.belongs_to(edge.to.table) {
			Some(relationship) => format!("{} {}", relationship.name, label),
			None => label.to_string(),
		};
		let style = if edge.field.nullable { ", style=dashed" } else { "" };
		let _ = writeln!(
			dot,
			"\t\"{}\":\"{}\" -> \"{}\":\"id\" [label=\"{}\"{}];",
			edge.from.table, edge.field.name, edge.to.table, label, style
		);
	}
	render_many_to_many(&mut dot, schema);
	dot += "}\n";
	dot
}

/// Both sides declare the relationship, so only the first one seen is drawn.
fn render_many_to_many(dot: &mut String, schema: &Schema) {
	let mut drawn = BTreeSet::new();
	for entity in schema.entities() {
		for relationship in entity.relationships {
			if let RelationshipKind::ManyToMany { via } = relationship.kind {
				let pair = if entity.table < relationship.target {
					(entity.table, relationship.target)
				} else {
					(relationship.target, entity.table)
				};
				if drawn.insert(pair) {
					let _ = writeln!(
						dot,
						"\t\"{}\" -> \"{}\" [label=\"{} M:N via {}\", style=bold, dir=both];",
						entity.table, relationship.target, relationship.name, via
					);
				}
			}
		}
	}
}

fn render_node(dot: &mut String, entity: &EntityDescriptor) {
	let header_color = if entity.association { "#dddddd" } else { "#b3cde3" };
	let _ = writeln!(dot, "\t\"{}\" [label=<", entity.table);
	dot.push_str("\t\t<table border=\"0\" cellborder=\"1\" cellspacing=\"0\">\n");
	let _ = writeln!(
		dot,
		"\t\t\t<tr><td colspan=\"3\" bgcolor=\"{}\"><b>{}</b></td></tr>",
		header_color, entity.name
	);
	for field in entity.fields {
		let _ = writeln!(
			dot,
			"\t\t\t<tr><td port=\"{}\" align=\"left\">{}</td><td align=\"left\">{}</td><td>{}</td></tr>",
			field.name,
			field.name,
			escape(&field.data_type.type_name()),
			markers(field)
		);
	}
	for check in entity.checks {
		match check {
			CheckConstraint::ExactlyOneOf(columns) => {
				let _ = writeln!(
					dot,
					"\t\t\t<tr><td colspan=\"3\"><i>exactly one of: {}</i></td></tr>",
					columns.join(", ")
				);
			}
		}
	}
	dot.push_str("\t\t</table>\n\t>];\n");
}

fn markers(field: &FieldDescriptor) -> String {
	let mut markers = Vec::new();
	if field.primary_key {
		markers.push("PK");
	}
	if field.references.is_some() {
		markers.push("FK");
	}
	if field.unique {
		markers.push("UQ");
	}
	if !field.nullable && !field.primary_key {
		markers.push("NN");
	}
	markers.join(" ")
}

fn escape(text: &str) -> String {
	text.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
}

/// Renders the diagram and writes it to the given file.
pub async fn write(schema: &Schema, path: impl AsRef<Path>) -> io::Result<()> {
	let path = path.as_ref();
	tokio::fs::write(path, render(schema)).await?;
	info!("Wrote schema diagram to {}.", path.display());
	Ok(())
}


#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_render_nodes() {
		let schema = Schema::load();
		let dot = render(&schema);
		assert!(dot.starts_with("digraph schema {\n"));
		assert!(dot.ends_with("}\n"));
		for entity in schema.entities() {
			assert!(dot.contains(&format!("\t\"{}\" [label=<", entity.table)));
		}
		assert!(dot.contains("<td port=\"username\" align=\"left\">username</td><td align=\"left\">varchar(50)</td><td>UQ NN</td>"));
		assert!(dot.contains("<i>exactly one of: character_id, planet_id</i>"));
	}

	#[test]
	fn test_render_edges() {
		let dot = render(&Schema::load());
		assert_eq!(dot.matches(" -> ").count(), 13);
		assert!(dot.contains("\t\"person\":\"user_id\" -> \"user\":\"id\" [label=\"user 1:1\", style=dashed];"));
		assert!(dot.contains("\t\"comment\":\"blog_post_id\" -> \"blogpost\":\"id\" [label=\"blogpost N:1\"];"));
		assert!(dot.contains("\t\"blogpost\":\"user_id\" -> \"user\":\"id\" [label=\"author N:1\"];"));
		assert!(dot.contains("\t\"blogpost_tag\":\"tag_id\" -> \"tag\":\"id\" [label=\"tag N:1\"];"));
	}

	#[test]
	fn test_render_many_to_many_once() {
		let dot = render(&Schema::load());
		let edge = "\t\"blogpost\" -> \"tag\" [label=\"tags M:N via blogpost_tag\", style=bold, dir=both];";
		assert_eq!(dot.matches(edge).count(), 1);
		assert!(!dot.contains("\"tag\" -> \"blogpost\""));
	}

	#[tokio::test]
	async fn test_write() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("diagram.dot");
		let schema = Schema::load();
		write(&schema, &path).await.unwrap();
		let written = tokio::fs::read_to_string(&path).await.unwrap();
		assert_eq!(written, render(&schema));
	}
}
