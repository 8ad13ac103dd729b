//! Minimal class file encoder used to build fixtures for the reader tests.

use std::collections::HashMap;

pub(crate) struct MethodSpec {
    name: String,
    descriptor: String,
    flags: u16,
    exceptions: Vec<String>,
}

impl MethodSpec {
    pub(crate) fn new(name: &str, descriptor: &str, flags: u16) -> Self {
        Self {
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            flags,
            exceptions: Vec::new(),
        }
    }

    pub(crate) fn throws(mut self, internal_name: &str) -> Self {
        self.exceptions.push(internal_name.to_string());
        self
    }
}

struct InnerClassSpec {
    inner: String,
    outer: String,
    simple_name: String,
    flags: u16,
}

pub(crate) struct ClassFileWriter {
    this_class: String,
    flags: u16,
    superclass: Option<String>,
    interfaces: Vec<String>,
    methods: Vec<MethodSpec>,
    permitted: Vec<String>,
    inner_classes: Vec<InnerClassSpec>,
    constants: Vec<String>,
}

impl ClassFileWriter {
    pub(crate) fn new(internal_name: &str, flags: u16) -> Self {
        Self {
            this_class: internal_name.to_string(),
            flags,
            superclass: None,
            interfaces: Vec::new(),
            methods: Vec::new(),
            permitted: Vec::new(),
            inner_classes: Vec::new(),
            constants: Vec::new(),
        }
    }

    pub(crate) fn superclass(mut self, internal_name: &str) -> Self {
        self.superclass = Some(internal_name.to_string());
        self
    }

    pub(crate) fn interface(mut self, internal_name: &str) -> Self {
        self.interfaces.push(internal_name.to_string());
        self
    }

    pub(crate) fn method(mut self, method: MethodSpec) -> Self {
        self.methods.push(method);
        self
    }

    /// Extra `CONSTANT_Utf8` entry nothing refers to, like a string literal.
    pub(crate) fn utf8_constant(mut self, value: &str) -> Self {
        self.constants.push(value.to_string());
        self
    }

    pub(crate) fn permitted_subclass(mut self, internal_name: &str) -> Self {
        self.permitted.push(internal_name.to_string());
        self
    }

    pub(crate) fn inner_class(mut self, inner: &str, outer: &str, simple: &str, flags: u16) -> Self {
        self.inner_classes.push(InnerClassSpec {
            inner: inner.to_string(),
            outer: outer.to_string(),
            simple_name: simple.to_string(),
            flags,
        });
        self
    }

    pub(crate) fn build(self) -> Vec<u8> {
        let mut pool = PoolWriter::default();
        let this_index = pool.class(&self.this_class);
        let super_index = self
            .superclass
            .as_deref()
            .map(|name| pool.class(name))
            .unwrap_or(0);
        let interface_indices: Vec<u16> =
            self.interfaces.iter().map(|name| pool.class(name)).collect();
        for value in &self.constants {
            pool.utf8(value);
        }

        let mut body = Vec::new();
        put_u2(&mut body, self.flags);
        put_u2(&mut body, this_index);
        put_u2(&mut body, super_index);
        put_u2(&mut body, interface_indices.len() as u16);
        for index in interface_indices {
            put_u2(&mut body, index);
        }
        put_u2(&mut body, 0); // fields

        put_u2(&mut body, self.methods.len() as u16);
        for method in &self.methods {
            put_u2(&mut body, method.flags);
            put_u2(&mut body, pool.utf8(&method.name));
            put_u2(&mut body, pool.utf8(&method.descriptor));
            if method.exceptions.is_empty() {
                put_u2(&mut body, 0);
            } else {
                put_u2(&mut body, 1);
                put_u2(&mut body, pool.utf8("Exceptions"));
                put_u4(&mut body, 2 + 2 * method.exceptions.len() as u32);
                put_u2(&mut body, method.exceptions.len() as u16);
                for exception in &method.exceptions {
                    put_u2(&mut body, pool.class(exception));
                }
            }
        }

        let mut attributes = Vec::new();
        let mut attribute_count = 0u16;
        if !self.permitted.is_empty() {
            attribute_count += 1;
            put_u2(&mut attributes, pool.utf8("PermittedSubclasses"));
            put_u4(&mut attributes, 2 + 2 * self.permitted.len() as u32);
            put_u2(&mut attributes, self.permitted.len() as u16);
            for name in &self.permitted {
                put_u2(&mut attributes, pool.class(name));
            }
        }
        if !self.inner_classes.is_empty() {
            attribute_count += 1;
            put_u2(&mut attributes, pool.utf8("InnerClasses"));
            put_u4(&mut attributes, 2 + 8 * self.inner_classes.len() as u32);
            put_u2(&mut attributes, self.inner_classes.len() as u16);
            for inner in &self.inner_classes {
                put_u2(&mut attributes, pool.class(&inner.inner));
                put_u2(&mut attributes, pool.class(&inner.outer));
                put_u2(&mut attributes, pool.utf8(&inner.simple_name));
                put_u2(&mut attributes, inner.flags);
            }
        }
        put_u2(&mut body, attribute_count);
        body.extend(attributes);

        let mut out = Vec::new();
        put_u4(&mut out, 0xCAFEBABE);
        put_u2(&mut out, 0); // minor
        put_u2(&mut out, 61); // major (Java 17)
        put_u2(&mut out, pool.next_index);
        out.extend(pool.bytes);
        out.extend(body);
        out
    }
}

struct PoolWriter {
    bytes: Vec<u8>,
    next_index: u16,
    utf8: HashMap<String, u16>,
    classes: HashMap<String, u16>,
}

impl Default for PoolWriter {
    fn default() -> Self {
        Self {
            bytes: Vec::new(),
            next_index: 1,
            utf8: HashMap::new(),
            classes: HashMap::new(),
        }
    }
}

impl PoolWriter {
    fn utf8(&mut self, value: &str) -> u16 {
        if let Some(index) = self.utf8.get(value) {
            return *index;
        }
        let index = self.next_index;
        let encoded = cesu8::to_java_cesu8(value);
        self.bytes.push(1);
        put_u2(&mut self.bytes, encoded.len() as u16);
        self.bytes.extend_from_slice(&encoded);
        self.next_index += 1;
        self.utf8.insert(value.to_string(), index);
        index
    }

    fn class(&mut self, internal_name: &str) -> u16 {
        if let Some(index) = self.classes.get(internal_name) {
            return *index;
        }
        let name_index = self.utf8(internal_name);
        let index = self.next_index;
        self.bytes.push(7);
        put_u2(&mut self.bytes, name_index);
        self.next_index += 1;
        self.classes.insert(internal_name.to_string(), index);
        index
    }
}

fn put_u2(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn put_u4(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}
