//! Dialect-wide `Message` enum generation.

/// One message as seen by the dispatch enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialectEntry {
    /// Message id.
    pub id: u32,
    /// Message name as declared.
    pub name: String,
    /// Generated struct name.
    pub type_name: String,
    /// CRC-extra byte.
    pub crc_extra: u8,
}

/// Generator for the `Message` enum that dispatches on message id.
pub struct DialectGenerator<'a> {
    runtime: &'a str,
    docs: bool,
}

impl<'a> DialectGenerator<'a> {
    /// Creates a new dialect generator.
    #[must_use]
    pub fn new(runtime: &'a str, docs: bool) -> Self {
        Self { runtime, docs }
    }

    /// Generates the `Message` enum and its dispatch methods.
    ///
    /// Returns an empty string when the dialect has no messages.
    #[must_use]
    pub fn generate(&self, entries: &[DialectEntry]) -> String {
        if entries.is_empty() {
            return String::new();
        }
        let rt = self.runtime;
        let mut output = String::new();

        if self.docs {
            output.push_str("/// Any message of the dialect.\n");
        }
        output.push_str("#[derive(Debug, Clone, PartialEq)]\n");
        output.push_str("pub enum Message {\n");
        for entry in entries {
            output.push_str(&format!("    {0}({0}),\n", entry.type_name));
        }
        output.push_str("}\n\n");

        output.push_str("impl Message {\n");

        self.doc(&mut output, "Decodes the payload of the message with the given id.");
        output.push_str(&format!(
            "    pub fn parse(id: u32, payload: &[u8]) -> {rt}::Result<Self> {{\n"
        ));
        output.push_str("        match id {\n");
        for entry in entries {
            output.push_str(&format!(
                "            {} => <{1} as {rt}::MavMessage>::decode(payload).map(Self::{1}),\n",
                entry.id, entry.type_name
            ));
        }
        output.push_str(&format!(
            "            _ => Err({rt}::Error::UnknownMessageId {{ id }}),\n"
        ));
        output.push_str("        }\n");
        output.push_str("    }\n\n");

        self.doc(&mut output, "Returns the message id.");
        output.push_str("    #[must_use]\n");
        output.push_str("    pub const fn message_id(&self) -> u32 {\n");
        output.push_str("        match self {\n");
        for entry in entries {
            output.push_str(&format!(
                "            Self::{}(_) => {},\n",
                entry.type_name, entry.id
            ));
        }
        output.push_str("        }\n");
        output.push_str("    }\n\n");

        self.doc(&mut output, "Returns the message name as declared in the dialect.");
        output.push_str("    #[must_use]\n");
        output.push_str("    pub const fn message_name(&self) -> &'static str {\n");
        output.push_str("        match self {\n");
        for entry in entries {
            output.push_str(&format!(
                "            Self::{}(_) => \"{}\",\n",
                entry.type_name, entry.name
            ));
        }
        output.push_str("        }\n");
        output.push_str("    }\n\n");

        self.doc(&mut output, "Looks up a message id by declared name.");
        output.push_str(&format!(
            "    pub fn message_id_from_name(name: &str) -> {rt}::Result<u32> {{\n"
        ));
        output.push_str("        match name {\n");
        for entry in entries {
            output.push_str(&format!("            \"{}\" => Ok({}),\n", entry.name, entry.id));
        }
        output.push_str(&format!(
            "            _ => Err({rt}::Error::UnknownMessageName {{\n                name: name.to_string(),\n            }}),\n"
        ));
        output.push_str("        }\n");
        output.push_str("    }\n\n");

        self.doc(&mut output, "Returns the message with the given id, every field zeroed.");
        output.push_str(&format!(
            "    pub fn default_message_from_id(id: u32) -> {rt}::Result<Self> {{\n"
        ));
        output.push_str("        match id {\n");
        for entry in entries {
            output.push_str(&format!(
                "            {} => Ok(Self::{}(::core::default::Default::default())),\n",
                entry.id, entry.type_name
            ));
        }
        output.push_str(&format!(
            "            _ => Err({rt}::Error::UnknownMessageId {{ id }}),\n"
        ));
        output.push_str("        }\n");
        output.push_str("    }\n\n");

        self.doc(&mut output, "Returns the CRC-extra byte of the message with the given id.");
        output.push_str("    #[must_use]\n");
        output.push_str("    pub const fn extra_crc(id: u32) -> ::core::option::Option<u8> {\n");
        output.push_str("        match id {\n");
        for entry in entries {
            output.push_str(&format!(
                "            {} => Some({}),\n",
                entry.id, entry.crc_extra
            ));
        }
        output.push_str("            _ => None,\n");
        output.push_str("        }\n");
        output.push_str("    }\n\n");

        self.doc(&mut output, "Encodes the message payload into `buf`.");
        output.push_str(&format!(
            "    pub fn encode(&self, buf: &mut [u8]) -> {rt}::Result<usize> {{\n"
        ));
        self.dispatch(&mut output, &format!("{rt}::MavMessage::encode(msg, buf)"), entries);
        output.push_str("    }\n\n");

        self.doc(&mut output, "Encodes the message payload into a new buffer.");
        output.push_str(&format!(
            "    pub fn to_bytes(&self) -> {rt}::Result<::std::vec::Vec<u8>> {{\n"
        ));
        self.dispatch(&mut output, &format!("{rt}::MavMessage::to_bytes(msg)"), entries);
        output.push_str("    }\n\n");

        self.doc(&mut output, "Stores the protocol version in messages that carry one.");
        output.push_str("    pub fn set_protocol_version(&mut self, version: u8) {\n");
        self.dispatch(
            &mut output,
            &format!("{rt}::MavMessage::set_protocol_version(msg, version)"),
            entries,
        );
        output.push_str("    }\n");
        output.push_str("}\n\n");

        for entry in entries {
            output.push_str(&format!(
                "impl ::core::convert::From<{0}> for Message {{\n    fn from(msg: {0}) -> Self {{\n        Self::{0}(msg)\n    }}\n}}\n\n",
                entry.type_name
            ));
        }
        output
    }

    fn doc(&self, output: &mut String, text: &str) {
        if self.docs {
            output.push_str(&format!("    /// {text}\n"));
        }
    }

    /// Writes a `match self` that forwards every variant to `call`, with the
    /// payload bound as `msg`.
    fn dispatch(&self, output: &mut String, call: &str, entries: &[DialectEntry]) {
        output.push_str("        match self {\n");
        for entry in entries {
            output.push_str(&format!(
                "            Self::{}(msg) => {call},\n",
                entry.type_name
            ));
        }
        output.push_str("        }\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<DialectEntry> {
        vec![
            DialectEntry {
                id: 0,
                name: "HEARTBEAT".to_string(),
                type_name: "Heartbeat".to_string(),
                crc_extra: 50,
            },
            DialectEntry {
                id: 4,
                name: "PING".to_string(),
                type_name: "Ping".to_string(),
                crc_extra: 237,
            },
        ]
    }

    #[test]
    fn test_empty_dialect() {
        assert!(DialectGenerator::new("::mavdl_core", true).generate(&[]).is_empty());
    }

    #[test]
    fn test_dispatch_arms() {
        let code = DialectGenerator::new("::mavdl_core", true).generate(&entries());
        assert!(code.contains("    Heartbeat(Heartbeat),\n    Ping(Ping),\n"));
        assert!(code.contains(
            "4 => <Ping as ::mavdl_core::MavMessage>::decode(payload).map(Self::Ping),"
        ));
        assert!(code.contains("\"PING\" => Ok(4),"));
        assert!(code.contains("4 => Some(237),"));
        assert!(code.contains("Self::Heartbeat(_) => \"HEARTBEAT\","));
        assert!(code.contains("impl ::core::convert::From<Ping> for Message {"));
        syn::parse_file(&code).expect("generated dispatch does not parse");
    }

    #[test]
    fn test_custom_runtime_path() {
        let code = DialectGenerator::new("crate::rt", false).generate(&entries());
        assert!(code.contains("crate::rt::Error::UnknownMessageId { id }"));
        assert!(!code.contains("///"));
        assert!(!code.contains("::mavdl_core"));
    }
}
