//! Markup parsing
//!
//! Uses html5ever's RcDom and copies the result into the host arena.
//! Markup is parsed as a document, so the children of the implied
//! `<head>` and `<body>` are taken as the fragment.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::memory::NodeData;
use crate::{ElementRef, HostError, MemoryHost};

impl MemoryHost {
    /// Parse `markup` and append the resulting nodes under `parent`.
    /// Returns the number of nodes created.
    pub(crate) fn append_markup(&mut self, parent: ElementRef, markup: &str) -> Result<usize, HostError> {
        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut markup.as_bytes())
            .map_err(|e| HostError::Parse(e.to_string()))?;

        let before = self.node_count();
        for html in dom.document.children.borrow().iter() {
            if !is_element(html, "html") {
                continue;
            }
            for section in html.children.borrow().iter() {
                for child in section.children.borrow().iter() {
                    self.convert_node(child, parent);
                }
            }
        }
        Ok(self.node_count() - before)
    }

    fn convert_node(&mut self, handle: &Handle, parent: ElementRef) {
        match &handle.data {
            RcNodeData::Text { contents } => {
                let text = contents.borrow().to_string();
                if !text.is_empty() {
                    self.insert(parent, NodeData::Text(text));
                }
            }
            RcNodeData::Element { name, attrs, .. } => {
                let attrs = attrs
                    .borrow()
                    .iter()
                    .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                    .collect();
                let id = self.insert(
                    parent,
                    NodeData::Element {
                        name: name.local.to_string(),
                        attrs,
                    },
                );
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, id);
                }
            }
            // Comments, doctypes and processing instructions carry nothing
            // the runtime reads
            _ => {}
        }
    }
}

fn is_element(handle: &Handle, local: &str) -> bool {
    matches!(&handle.data, RcNodeData::Element { name, .. } if &*name.local == local)
}
