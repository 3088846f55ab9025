#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BannerKind {
    /// Stays until the condition behind it is fixed.
    Persistent,
    /// Cleared by the next successful reply.
    Transient,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: String,
}

impl Banner {
    pub fn persistent(text: &str) -> Banner {
        return Banner {
            kind: BannerKind::Persistent,
            text: text.to_string(),
        };
    }

    pub fn transient(text: &str) -> Banner {
        return Banner {
            kind: BannerKind::Transient,
            text: text.to_string(),
        };
    }

    pub fn is_persistent(&self) -> bool {
        return self.kind == BannerKind::Persistent;
    }
}
