//! A minimal [`Listener`] that builds a generic, untyped document tree.
//!
//! The parser has no notion of a persistent tree, so anything that wants one
//! (a config loader, a CLI pretty-printer, a test fixture) implements
//! `Listener` itself and keeps a stack of in-progress containers, the same
//! way this example does.

use thjson::{parse_str, Listener, ParserOptions, Primitive};

/// One node of the generic document tree.
#[derive(Debug, Clone, PartialEq)]
enum Node {
    Null,
    Boolean(bool),
    Integer(i32),
    Float(f32),
    Str(String),
    Bytes(Vec<u8>),
    Map {
        class: Option<String>,
        entries: Vec<(String, Node)>,
    },
    Array {
        class: Option<String>,
        items: Vec<Node>,
    },
}

impl From<&Primitive<'_>> for Node {
    fn from(value: &Primitive<'_>) -> Self {
        match value {
            Primitive::Null => Node::Null,
            Primitive::Boolean(b) => Node::Boolean(*b),
            Primitive::Integer(v, _kind) => Node::Integer(*v),
            Primitive::Float(f) => Node::Float(*f),
            Primitive::Str(text, _kind) => Node::Str(text.as_str().to_string()),
            Primitive::Bytes(bytes, _kind) => Node::Bytes(bytes.as_slice().to_vec()),
        }
    }
}

/// A container being built, with its key (if any) in the parent it will be
/// spliced back into once closed.
struct Frame {
    key: Option<String>,
    node: Node,
}

#[derive(Default)]
struct DomBuilder {
    stack: Vec<Frame>,
    root: Option<Node>,
}

impl DomBuilder {
    fn into_root(self) -> Node {
        self.root.expect("begin()/end() always bracket a parse")
    }

    fn push_map(&mut self, key: Option<&str>, class: Option<&str>) {
        self.stack.push(Frame {
            key: key.map(str::to_string),
            node: Node::Map {
                class: class.map(str::to_string),
                entries: Vec::new(),
            },
        });
    }

    fn push_array(&mut self, key: Option<&str>, class: Option<&str>) {
        self.stack.push(Frame {
            key: key.map(str::to_string),
            node: Node::Array {
                class: class.map(str::to_string),
                items: Vec::new(),
            },
        });
    }

    fn pop_into_parent(&mut self) {
        let frame = self.stack.pop().expect("matched begin/end pair");
        self.attach(frame.key, frame.node);
    }

    fn attach(&mut self, key: Option<String>, node: Node) {
        match self.stack.last_mut() {
            Some(parent) => match &mut parent.node {
                Node::Map { entries, .. } => entries.push((key.expect("map entry needs a key"), node)),
                Node::Array { items, .. } => items.push(node),
                _ => unreachable!("non-container frame on the stack"),
            },
            None => self.root = Some(node),
        }
    }
}

impl Listener for DomBuilder {
    fn begin(&mut self) {
        // The root itself never gets a `begin_map`-style event; push a
        // synthetic frame so root-level members have somewhere to land.
        self.push_map(None, None);
    }
    fn end(&mut self) {
        self.pop_into_parent();
    }

    fn begin_object(&mut self, key: &str, class: &str) {
        self.push_map(Some(key), Some(class));
    }
    fn begin_object_value(&mut self, class: &str) {
        self.push_map(None, Some(class));
    }
    fn begin_map(&mut self, key: &str) {
        self.push_map(Some(key), None);
    }
    fn begin_map_value(&mut self) {
        self.push_map(None, None);
    }
    fn begin_list(&mut self, key: &str, class: &str) {
        self.push_array(Some(key), Some(class));
    }
    fn begin_list_value(&mut self, class: &str) {
        self.push_array(None, Some(class));
    }
    fn begin_array(&mut self, key: &str) {
        self.push_array(Some(key), None);
    }
    fn begin_array_value(&mut self) {
        self.push_array(None, None);
    }

    fn end_object(&mut self) {
        self.pop_into_parent();
    }
    fn end_map(&mut self) {
        self.pop_into_parent();
    }
    fn end_list(&mut self) {
        self.pop_into_parent();
    }
    fn end_array(&mut self) {
        self.pop_into_parent();
    }

    fn property(&mut self, key: &str, value: &Primitive<'_>) {
        self.attach(Some(key.to_string()), Node::from(value));
    }
    fn value(&mut self, value: &Primitive<'_>) {
        self.attach(None, Node::from(value));
    }
    fn null_property(&mut self, key: &str) {
        self.attach(Some(key.to_string()), Node::Null);
    }
    fn null_value(&mut self) {
        self.attach(None, Node::Null);
    }
}

fn main() {
    let input = r#"
        player: (Player) {
          name: Aria
          hp: 30
          inventory: [ sword, shield, potion ]
        }
    "#;

    let mut dom = DomBuilder::default();
    parse_str(input, &mut dom, ParserOptions::default()).expect("valid THJSON");
    println!("{:#?}", dom.into_root());
}
