//! Relationships between insights
//!
//! Edges are stored symmetrically: linking `(A, B, kind)` also records
//! `(B, A, kind.reverse())`.

use crate::InsightId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of relationship between two insights
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RelationshipType {
    /// One insight supports another
    Supports,
    /// Reverse of `Supports`
    SupportedBy,
    /// One insight contradicts another
    Contradicts,
    /// Reverse of `Contradicts`
    ContradictedBy,
    /// One insight extends another
    Extends,
    /// Reverse of `Extends`
    ExtendedBy,
    /// One insight depends on another
    DependsOn,
    /// Reverse of `DependsOn`
    DependedOnBy,
    /// Any kind outside the closed set; its own reverse
    Other(String),
}

impl RelationshipType {
    /// The kind recorded on the reverse edge
    pub fn reverse(&self) -> Self {
        match self {
            RelationshipType::Supports => RelationshipType::SupportedBy,
            RelationshipType::SupportedBy => RelationshipType::Supports,
            RelationshipType::Contradicts => RelationshipType::ContradictedBy,
            RelationshipType::ContradictedBy => RelationshipType::Contradicts,
            RelationshipType::Extends => RelationshipType::ExtendedBy,
            RelationshipType::ExtendedBy => RelationshipType::Extends,
            RelationshipType::DependsOn => RelationshipType::DependedOnBy,
            RelationshipType::DependedOnBy => RelationshipType::DependsOn,
            RelationshipType::Other(kind) => RelationshipType::Other(kind.clone()),
        }
    }

    /// Parse a wire name; unknown names become `Other`
    pub fn parse(s: &str) -> Self {
        match s {
            "supports" => RelationshipType::Supports,
            "supported_by" => RelationshipType::SupportedBy,
            "contradicts" => RelationshipType::Contradicts,
            "contradicted_by" => RelationshipType::ContradictedBy,
            "extends" => RelationshipType::Extends,
            "extended_by" => RelationshipType::ExtendedBy,
            "depends_on" => RelationshipType::DependsOn,
            "depended_on_by" => RelationshipType::DependedOnBy,
            other => RelationshipType::Other(other.to_string()),
        }
    }

    /// Wire name
    pub fn as_str(&self) -> &str {
        match self {
            RelationshipType::Supports => "supports",
            RelationshipType::SupportedBy => "supported_by",
            RelationshipType::Contradicts => "contradicts",
            RelationshipType::ContradictedBy => "contradicted_by",
            RelationshipType::Extends => "extends",
            RelationshipType::ExtendedBy => "extended_by",
            RelationshipType::DependsOn => "depends_on",
            RelationshipType::DependedOnBy => "depended_on_by",
            RelationshipType::Other(kind) => kind,
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for RelationshipType {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<&str> for RelationshipType {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<RelationshipType> for String {
    fn from(kind: RelationshipType) -> Self {
        kind.as_str().to_string()
    }
}

/// A directed edge between two insights
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Source insight
    pub from: InsightId,

    /// Target insight
    pub to: InsightId,

    /// Kind of relationship
    pub relationship_type: RelationshipType,

    /// When the edge was established (ms)
    pub created_at: u64,
}

impl Relationship {
    /// Create a new edge
    pub fn new(
        from: InsightId,
        to: InsightId,
        relationship_type: RelationshipType,
        created_at: u64,
    ) -> Self {
        Self {
            from,
            to,
            relationship_type,
            created_at,
        }
    }

    /// The mirrored edge
    pub fn reversed(&self) -> Self {
        Self {
            from: self.to,
            to: self.from,
            relationship_type: self.relationship_type.reverse(),
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_pairs() {
        assert_eq!(RelationshipType::Supports.reverse(), RelationshipType::SupportedBy);
        assert_eq!(RelationshipType::ContradictedBy.reverse(), RelationshipType::Contradicts);
        assert_eq!(RelationshipType::Extends.reverse(), RelationshipType::ExtendedBy);
        assert_eq!(RelationshipType::DependsOn.reverse(), RelationshipType::DependedOnBy);
    }

    #[test]
    fn test_unknown_kind_is_its_own_reverse() {
        let kind = RelationshipType::parse("relates_to");
        assert_eq!(kind, RelationshipType::Other("relates_to".to_string()));
        assert_eq!(kind.reverse(), kind);
    }

    #[test]
    fn test_reversed_edge() {
        let a = InsightId::new();
        let b = InsightId::new();
        let edge = Relationship::new(a, b, RelationshipType::Supports, 10);
        let back = edge.reversed();

        assert_eq!(back.from, b);
        assert_eq!(back.to, a);
        assert_eq!(back.relationship_type, RelationshipType::SupportedBy);
    }

    #[test]
    fn test_serializes_as_wire_name() {
        let json = serde_json::to_string(&RelationshipType::DependedOnBy).unwrap();
        assert_eq!(json, "\"depended_on_by\"");
        let parsed: RelationshipType = serde_json::from_str("\"custom\"").unwrap();
        assert_eq!(parsed, RelationshipType::Other("custom".to_string()));
    }
}
