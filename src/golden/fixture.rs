use crate::core::Language;
use crate::errors::GoldenError;
use std::collections::BTreeMap;

/// Source text paired with its expected canonical report. Read-only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoldenFixture {
    pub id: String,
    pub language: Language,
    pub source: String,
    /// Canonical serialized `MetricReport`.
    pub expected: String,
}

impl GoldenFixture {
    pub fn new(
        id: impl Into<String>,
        language: Language,
        source: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            language,
            source: source.into(),
            expected: expected.into(),
        }
    }
}

/// Where the comparator gets fixtures from. Implementations hand over text
/// that is already loaded; the comparator itself never touches the disk.
pub trait FixtureSource: Send + Sync {
    fn fixture(&self, id: &str) -> Result<GoldenFixture, GoldenError>;

    /// Every identifier this source knows about, sorted.
    fn ids(&self) -> Vec<String>;
}

#[derive(Clone, Debug, Default)]
pub struct InMemoryFixtures {
    fixtures: BTreeMap<String, GoldenFixture>,
}

impl InMemoryFixtures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, fixture: GoldenFixture) -> Option<GoldenFixture> {
        self.fixtures.insert(fixture.id.clone(), fixture)
    }

    pub fn with(mut self, fixture: GoldenFixture) -> Self {
        self.insert(fixture);
        self
    }

    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }
}

impl FromIterator<GoldenFixture> for InMemoryFixtures {
    fn from_iter<I: IntoIterator<Item = GoldenFixture>>(iter: I) -> Self {
        let mut fixtures = Self::new();
        for fixture in iter {
            fixtures.insert(fixture);
        }
        fixtures
    }
}

impl FixtureSource for InMemoryFixtures {
    fn fixture(&self, id: &str) -> Result<GoldenFixture, GoldenError> {
        self.fixtures
            .get(id)
            .cloned()
            .ok_or_else(|| GoldenError::FixtureNotFound { id: id.to_string() })
    }

    fn ids(&self) -> Vec<String> {
        self.fixtures.keys().cloned().collect()
    }
}
