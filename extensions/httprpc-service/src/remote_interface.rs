/// The declared return shape of a remote method.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ReturnKind {
    /// A non-nullable asynchronous result handle. The only valid shape.
    Deferred,
    NullableDeferred,
    Immediate,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct MethodSignature {
    name: &'static str,
    returns: ReturnKind,
}

impl MethodSignature {
    pub const fn new(name: &'static str, returns: ReturnKind) -> Self {
        Self { name, returns }
    }

    pub const fn deferred(name: &'static str) -> Self {
        Self::new(name, ReturnKind::Deferred)
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn returns(&self) -> ReturnKind {
        self.returns
    }
}

/// A named remote interface and the methods callers may invoke on it.
///
/// Interfaces are matched by name, ignoring ASCII case.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RemoteInterface {
    name: &'static str,
    methods: &'static [MethodSignature],
}

impl RemoteInterface {
    pub const fn new(name: &'static str, methods: &'static [MethodSignature]) -> Self {
        Self { name, methods }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn methods(&self) -> &'static [MethodSignature] {
        self.methods
    }

    pub fn method(&self, method_name: &str) -> Option<&MethodSignature> {
        self.methods.iter().find(|m| m.name == method_name)
    }

    pub fn has_method(&self, method_name: &str) -> bool {
        self.method(method_name).is_some()
    }

    pub fn matches(&self, interface_name: &str) -> bool {
        self.name.eq_ignore_ascii_case(interface_name)
    }
}
