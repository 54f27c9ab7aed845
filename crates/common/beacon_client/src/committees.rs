use std::{fmt, mem, sync::Arc};

use parking_lot::Mutex;
use serde::{
    Deserialize,
    de::{self, DeserializeSeed, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor},
};
use serde_utils::quoted_u64::MaybeQuoted;
use tracing::trace;

/// Upper bound on idle buffer sets kept for reuse.
pub const MAX_IDLE_BUFFERS: usize = 8;

/// Read access to the committees of one epoch.
///
/// Offsets run from `0` to `count() - 1`; accessors panic on an out-of-range offset, like slice
/// indexing. Call [Committees::release] when done so the backing buffers can be reused; dropping
/// the view has the same effect.
pub trait Committees: Send + Sync {
    fn index(&self, offset: usize) -> u64;

    fn slot(&self, offset: usize) -> u64;

    fn validators(&self, offset: usize) -> &[u64];

    fn validator_count(&self, offset: usize) -> usize;

    fn count(&self) -> usize;

    fn release(self: Box<Self>);
}

#[derive(Debug, Clone, Copy)]
struct CommitteeEntry {
    index: u64,
    slot: u64,
    start: usize,
    len: usize,
}

/// Flat storage for an epoch: every committee's validator indices back to back in one vector.
#[derive(Debug, Default)]
struct CommitteeBuffers {
    validators: Vec<u64>,
    committees: Vec<CommitteeEntry>,
}

impl CommitteeBuffers {
    fn clear(&mut self) {
        self.validators.clear();
        self.committees.clear();
    }
}

/// Pool of committee buffers shared by every view it hands out.
#[derive(Debug, Clone, Default)]
pub struct CommitteePool {
    idle: Arc<Mutex<Vec<CommitteeBuffers>>>,
}

impl CommitteePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes an empty view, reusing idle buffers when there are any.
    pub fn checkout(&self) -> PooledCommittees {
        let buffers = self.idle.lock().pop().unwrap_or_default();
        trace!(
            validators_capacity = buffers.validators.capacity(),
            "Checked out committee buffers"
        );
        PooledCommittees {
            buffers,
            pool: self.clone(),
        }
    }

    /// Decodes a `/eth/v1/beacon/states/{state_id}/committees` response body straight into
    /// pooled buffers.
    pub fn decode_json(&self, bytes: &[u8]) -> Result<PooledCommittees, serde_json::Error> {
        let mut committees = self.checkout();
        let mut deserializer = serde_json::Deserializer::from_slice(bytes);
        CommitteesResponseSeed(&mut committees.buffers).deserialize(&mut deserializer)?;
        deserializer.end()?;
        Ok(committees)
    }

    pub fn idle_buffers(&self) -> usize {
        self.idle.lock().len()
    }

    fn give_back(&self, mut buffers: CommitteeBuffers) {
        buffers.clear();
        let mut idle = self.idle.lock();
        if idle.len() < MAX_IDLE_BUFFERS {
            idle.push(buffers);
            trace!(idle = idle.len(), "Returned committee buffers to pool");
        }
    }
}

/// A [Committees] view whose buffers go back to their [CommitteePool] when released or dropped.
#[derive(Debug)]
pub struct PooledCommittees {
    buffers: CommitteeBuffers,
    pool: CommitteePool,
}

impl PooledCommittees {
    pub fn push(&mut self, index: u64, slot: u64, validators: &[u64]) {
        let start = self.buffers.validators.len();
        self.buffers.validators.extend_from_slice(validators);
        self.buffers.committees.push(CommitteeEntry {
            index,
            slot,
            start,
            len: validators.len(),
        });
    }

    fn entry(&self, offset: usize) -> &CommitteeEntry {
        &self.buffers.committees[offset]
    }
}

impl Committees for PooledCommittees {
    fn index(&self, offset: usize) -> u64 {
        self.entry(offset).index
    }

    fn slot(&self, offset: usize) -> u64 {
        self.entry(offset).slot
    }

    fn validators(&self, offset: usize) -> &[u64] {
        let entry = self.entry(offset);
        &self.buffers.validators[entry.start..entry.start + entry.len]
    }

    fn validator_count(&self, offset: usize) -> usize {
        self.entry(offset).len
    }

    fn count(&self) -> usize {
        self.buffers.committees.len()
    }

    fn release(self: Box<Self>) {}
}

impl Drop for PooledCommittees {
    fn drop(&mut self) {
        self.pool.give_back(mem::take(&mut self.buffers));
    }
}

#[derive(Deserialize)]
#[serde(field_identifier, rename_all = "snake_case")]
enum ResponseField {
    Data,
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
#[serde(field_identifier, rename_all = "snake_case")]
enum CommitteeField {
    Index,
    Slot,
    Validators,
    #[serde(other)]
    Other,
}

struct CommitteesResponseSeed<'a>(&'a mut CommitteeBuffers);

impl<'de> DeserializeSeed<'de> for CommitteesResponseSeed<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for CommitteesResponseSeed<'_> {
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a committees response object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<(), A::Error> {
        let buffers = self.0;
        let mut has_data = false;
        while let Some(field) = map.next_key::<ResponseField>()? {
            match field {
                ResponseField::Data => {
                    map.next_value_seed(CommitteeListSeed(&mut *buffers))?;
                    has_data = true;
                }
                ResponseField::Other => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        if !has_data {
            return Err(de::Error::missing_field("data"));
        }
        Ok(())
    }
}

struct CommitteeListSeed<'a>(&'a mut CommitteeBuffers);

impl<'de> DeserializeSeed<'de> for CommitteeListSeed<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_seq(self)
    }
}

impl<'de> Visitor<'de> for CommitteeListSeed<'_> {
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a list of committees")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<(), A::Error> {
        let buffers = self.0;
        while seq
            .next_element_seed(CommitteeSeed(&mut *buffers))?
            .is_some()
        {}
        Ok(())
    }
}

struct CommitteeSeed<'a>(&'a mut CommitteeBuffers);

impl<'de> DeserializeSeed<'de> for CommitteeSeed<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for CommitteeSeed<'_> {
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a committee object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<(), A::Error> {
        let buffers = self.0;
        let start = buffers.validators.len();
        let mut index = None;
        let mut slot = None;
        let mut has_validators = false;
        while let Some(field) = map.next_key::<CommitteeField>()? {
            match field {
                CommitteeField::Index => index = Some(map.next_value::<MaybeQuoted<u64>>()?.value),
                CommitteeField::Slot => slot = Some(map.next_value::<MaybeQuoted<u64>>()?.value),
                CommitteeField::Validators => {
                    if has_validators {
                        return Err(de::Error::duplicate_field("validators"));
                    }
                    map.next_value_seed(ValidatorListSeed(&mut buffers.validators))?;
                    has_validators = true;
                }
                CommitteeField::Other => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        let index = index.ok_or_else(|| de::Error::missing_field("index"))?;
        let slot = slot.ok_or_else(|| de::Error::missing_field("slot"))?;
        if !has_validators {
            return Err(de::Error::missing_field("validators"));
        }
        buffers.committees.push(CommitteeEntry {
            index,
            slot,
            start,
            len: buffers.validators.len() - start,
        });
        Ok(())
    }
}

struct ValidatorListSeed<'a>(&'a mut Vec<u64>);

impl<'de> DeserializeSeed<'de> for ValidatorListSeed<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_seq(self)
    }
}

impl<'de> Visitor<'de> for ValidatorListSeed<'_> {
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a list of validator indices")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<(), A::Error> {
        let validators = self.0;
        if let Some(hint) = seq.size_hint() {
            validators.reserve(hint);
        }
        while let Some(index) = seq.next_element::<MaybeQuoted<u64>>()? {
            validators.push(index.value);
        }
        Ok(())
    }
}
