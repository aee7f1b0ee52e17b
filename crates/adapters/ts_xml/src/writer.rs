//! `.ts` document writer, in the layout Qt's `lupdate` emits.

use quick_xml::escape::escape;

use svctray_domain::catalog::{Location, Message, TranslationTable};

const MESSAGE_INDENT: &str = "    ";
const FIELD_INDENT: &str = "        ";
const FORM_INDENT: &str = "            ";

fn push_element(out: &mut String, indent: &str, name: &str, attrs: &str, text: &str) {
    out.push_str(indent);
    out.push('<');
    out.push_str(name);
    out.push_str(attrs);
    out.push('>');
    out.push_str(&escape(text));
    out.push_str("</");
    out.push_str(name);
    out.push_str(">\n");
}

fn push_optional(out: &mut String, name: &str, text: Option<&str>) {
    if let Some(text) = text {
        push_element(out, FIELD_INDENT, name, "", text);
    }
}

fn push_location(out: &mut String, location: &Location) {
    out.push_str(FIELD_INDENT);
    out.push_str("<location");
    if let Some(filename) = &location.filename {
        out.push_str(" filename=\"");
        out.push_str(&escape(filename.as_str()));
        out.push('"');
    }
    if let Some(line) = location.line {
        out.push_str(" line=\"");
        out.push_str(&line.to_string());
        out.push('"');
    }
    out.push_str("/>\n");
}

fn push_translation(out: &mut String, message: &Message) {
    let attrs = message
        .translation
        .status
        .as_attr()
        .map(|kind| format!(" type=\"{kind}\""))
        .unwrap_or_default();
    if !message.numerus {
        push_element(out, FIELD_INDENT, "translation", &attrs, &message.translation.text);
        return;
    }
    out.push_str(FIELD_INDENT);
    out.push_str("<translation");
    out.push_str(&attrs);
    out.push_str(">\n");
    for form in &message.translation.forms {
        push_element(out, FORM_INDENT, "numerusform", "", form);
    }
    out.push_str(FIELD_INDENT);
    out.push_str("</translation>\n");
}

fn push_message(out: &mut String, message: &Message) {
    out.push_str(MESSAGE_INDENT);
    out.push_str(if message.numerus {
        "<message numerus=\"yes\">\n"
    } else {
        "<message>\n"
    });
    for location in &message.locations {
        push_location(out, location);
    }
    push_element(out, FIELD_INDENT, "source", "", &message.source);
    push_optional(out, "oldsource", message.old_source.as_deref());
    push_optional(out, "comment", message.comment.as_deref());
    push_optional(out, "oldcomment", message.old_comment.as_deref());
    push_optional(out, "extracomment", message.extra_comment.as_deref());
    push_optional(out, "translatorcomment", message.translator_comment.as_deref());
    push_translation(out, message);
    out.push_str(MESSAGE_INDENT);
    out.push_str("</message>\n");
}

/// Serialize `table` as a `.ts` document.
///
/// Parsing the output yields the same table.
#[must_use]
pub fn to_string(table: &TranslationTable) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE TS>\n");
    out.push_str("<TS version=\"");
    out.push_str(&escape(table.version.as_str()));
    out.push_str("\" language=\"");
    out.push_str(table.language.as_str());
    if let Some(source_language) = &table.source_language {
        out.push_str("\" sourcelanguage=\"");
        out.push_str(&escape(source_language.as_str()));
    }
    out.push_str("\">\n");
    for context in &table.contexts {
        out.push_str("<context>\n");
        push_element(&mut out, MESSAGE_INDENT, "name", "", &context.name);
        for message in &context.messages {
            push_message(&mut out, message);
        }
        out.push_str("</context>\n");
    }
    out.push_str("</TS>\n");
    out
}
