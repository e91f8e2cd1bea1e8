use crate::{
    config::{ConfigError, SectionConfig, validate_sections},
    error::{Error, Result},
    types::{SeatRef, SeatState},
};
use parking_lot::Mutex;
use std::collections::HashMap;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// A seat inventory partitioned into named sections, handing out seats with a
/// round-robin policy across sections.
///
/// The section layout is fixed at construction, so section names are resolved
/// without taking the lock. Seat state and the round-robin cursor live behind
/// a single allocator-wide [`Mutex`]; every mutation is one critical section.
///
/// ## Assignment policy
/// - The section under the cursor is the only one tried.
/// - Within that section the lowest free seat number is taken.
/// - The cursor advances (wrapping) only when a seat was assigned.
///
/// A full section under the cursor fails the call even when other sections
/// still have room. Spreading passengers evenly is preferred over accepting
/// every request.
///
/// ## Example
/// ```
/// use ticketrail::{SeatAllocator, SectionConfig};
///
/// let allocator = SeatAllocator::new(&[
///     SectionConfig::new("A", 2),
///     SectionConfig::new("B", 2),
/// ])
/// .unwrap();
///
/// let first = allocator.assign_seat().unwrap();
/// let second = allocator.assign_seat().unwrap();
/// assert_eq!((first.section.as_str(), first.number), ("A", 1));
/// assert_eq!((second.section.as_str(), second.number), ("B", 1));
/// ```
#[derive(Debug)]
pub struct SeatAllocator {
    sections: Vec<SectionConfig>,
    index: HashMap<String, usize>,
    state: Mutex<AllocatorState>,
}

#[derive(Debug)]
struct AllocatorState {
    // `seats[section][n - 1]` holds the state of seat `n`.
    seats: Vec<Vec<SeatState>>,
    cursor: usize,
}

impl SeatAllocator {
    /// Creates an allocator with every seat `Available` and the cursor on the
    /// first section.
    ///
    /// # Errors
    /// Fails if the list is empty, a name is empty or repeated, or a capacity
    /// is zero.
    pub fn new(sections: &[SectionConfig]) -> core::result::Result<Self, ConfigError> {
        validate_sections(sections)?;

        let index = sections
            .iter()
            .enumerate()
            .map(|(i, section)| (section.name.clone(), i))
            .collect();
        let seats = sections
            .iter()
            .map(|section| vec![SeatState::Available; section.capacity as usize])
            .collect();

        Ok(Self {
            sections: sections.to_vec(),
            index,
            state: Mutex::new(AllocatorState { seats, cursor: 0 }),
        })
    }

    /// Assigns a free seat in the section under the round-robin cursor.
    ///
    /// # Errors
    /// Returns [`Error::NoSeatsAvailable`] if that section is full. Other
    /// sections are not tried and the cursor stays where it is.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn assign_seat(&self) -> Result<SeatRef> {
        let mut state = self.state.lock();
        let cursor = state.cursor;
        let section = &self.sections[cursor].name;

        let Some(slot) = state.seats[cursor]
            .iter()
            .position(|seat| *seat == SeatState::Available)
        else {
            #[cfg(feature = "tracing")]
            tracing::debug!(section = %section, "section under cursor is full");
            return Err(Error::NoSeatsAvailable {
                section: section.clone(),
            });
        };

        state.seats[cursor][slot] = SeatState::Assigned;
        state.cursor = (cursor + 1) % self.sections.len();

        Ok(SeatRef::new(section.clone(), slot as u32 + 1))
    }

    /// Marks an assigned seat `Available` again.
    ///
    /// # Errors
    /// - [`Error::SectionNotFound`] if the section is unknown.
    /// - [`Error::SeatNotAssigned`] if the seat is free or out of range.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn release_seat(&self, seat: u32, section: &str) -> Result<()> {
        let idx = self.section_index(section)?;

        let mut state = self.state.lock();
        match slot_mut(&mut state.seats[idx], seat) {
            Some(slot) if *slot == SeatState::Assigned => {
                *slot = SeatState::Available;
                Ok(())
            }
            _ => Err(Error::SeatNotAssigned {
                section: section.to_string(),
                seat,
            }),
        }
    }

    /// Moves an occupant from one seat to another in a single critical
    /// section. Either both seats change state or neither does.
    ///
    /// # Errors
    /// - [`Error::SectionNotFound`] if either section is unknown.
    /// - [`Error::SeatNotAssigned`] if the source seat is not occupied.
    /// - [`Error::SeatUnavailable`] if the target seat is not free. This
    ///   includes out of range targets and moving a seat onto itself.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn modify_seat(
        &self,
        seat: u32,
        section: &str,
        new_seat: u32,
        new_section: &str,
    ) -> Result<()> {
        let from = self.section_index(section)?;
        let to = self.section_index(new_section)?;

        let mut state = self.state.lock();

        if slot_mut(&mut state.seats[from], seat).copied() != Some(SeatState::Assigned) {
            return Err(Error::SeatNotAssigned {
                section: section.to_string(),
                seat,
            });
        }
        if slot_mut(&mut state.seats[to], new_seat).copied() != Some(SeatState::Available) {
            return Err(Error::SeatUnavailable {
                section: new_section.to_string(),
                seat: new_seat,
            });
        }

        state.seats[from][seat as usize - 1] = SeatState::Available;
        state.seats[to][new_seat as usize - 1] = SeatState::Assigned;
        Ok(())
    }

    /// The configured sections, in round-robin order.
    pub fn sections(&self) -> &[SectionConfig] {
        &self.sections
    }

    /// The section the next [`assign_seat`](Self::assign_seat) will target.
    pub fn next_section(&self) -> &str {
        &self.sections[self.state.lock().cursor].name
    }

    /// Returns the state of a seat, or `None` if it does not exist.
    pub fn seat_state(&self, seat: &SeatRef) -> Option<SeatState> {
        let idx = *self.index.get(&seat.section)?;
        slot_mut(&mut self.state.lock().seats[idx], seat.number).copied()
    }

    /// Number of free seats left in a section.
    ///
    /// # Errors
    /// Returns [`Error::SectionNotFound`] if the section is unknown.
    pub fn available_seats(&self, section: &str) -> Result<usize> {
        let idx = self.section_index(section)?;
        let state = self.state.lock();
        Ok(state.seats[idx]
            .iter()
            .filter(|seat| **seat == SeatState::Available)
            .count())
    }

    /// Every occupied seat, grouped by section in round-robin order and
    /// ascending seat number.
    pub fn assigned_seats(&self) -> Vec<SeatRef> {
        let state = self.state.lock();
        self.sections
            .iter()
            .zip(&state.seats)
            .flat_map(|(section, seats)| {
                seats.iter().enumerate().filter_map(move |(i, seat)| {
                    (*seat == SeatState::Assigned)
                        .then(|| SeatRef::new(section.name.clone(), i as u32 + 1))
                })
            })
            .collect()
    }

    fn section_index(&self, section: &str) -> Result<usize> {
        self.index
            .get(section)
            .copied()
            .ok_or_else(|| Error::SectionNotFound {
                section: section.to_string(),
            })
    }
}

// Seat numbers are 1-based; 0 and anything past capacity resolve to `None`.
fn slot_mut(seats: &mut [SeatState], seat: u32) -> Option<&mut SeatState> {
    let n = (seat as usize).checked_sub(1)?;
    seats.get_mut(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::thread::scope;

    fn allocator(sections: &[(&str, u32)]) -> SeatAllocator {
        let sections: Vec<_> = sections
            .iter()
            .map(|(name, capacity)| SectionConfig::new(*name, *capacity))
            .collect();
        SeatAllocator::new(&sections).unwrap()
    }

    #[test]
    fn rejects_invalid_layouts() {
        assert_eq!(SeatAllocator::new(&[]).unwrap_err(), ConfigError::NoSections);
        assert_eq!(
            SeatAllocator::new(&[SectionConfig::new("A", 0)]).unwrap_err(),
            ConfigError::EmptySection("A".into())
        );
    }

    #[test]
    fn keeps_configured_section_order() {
        let allocator = allocator(&[("B", 2), ("A", 3)]);
        assert_eq!(
            allocator.sections(),
            [SectionConfig::new("B", 2), SectionConfig::new("A", 3)]
        );
        assert_eq!(allocator.next_section(), "B");
        assert_eq!(allocator.assign_seat().unwrap(), SeatRef::new("B", 1));
    }

    #[test]
    fn alternates_sections_starting_with_first() {
        let allocator = allocator(&[("A", 3), ("B", 3)]);
        let seats: Vec<_> = (0..4).map(|_| allocator.assign_seat().unwrap()).collect();
        assert_eq!(
            seats,
            vec![
                SeatRef::new("A", 1),
                SeatRef::new("B", 1),
                SeatRef::new("A", 2),
                SeatRef::new("B", 2),
            ]
        );
    }

    #[test]
    fn wraps_over_more_than_two_sections() {
        let allocator = allocator(&[("A", 1), ("B", 1), ("C", 1)]);
        let sections: Vec<_> = (0..3)
            .map(|_| allocator.assign_seat().unwrap().section)
            .collect();
        assert_eq!(sections, ["A", "B", "C"]);
        assert_eq!(allocator.next_section(), "A");
    }

    #[test]
    fn never_exceeds_section_capacity() {
        let allocator = allocator(&[("A", 5)]);
        for n in 1..=5 {
            assert_eq!(allocator.assign_seat().unwrap(), SeatRef::new("A", n));
        }
        let err = allocator.assign_seat().unwrap_err();
        assert_eq!(
            err,
            Error::NoSeatsAvailable {
                section: "A".into()
            }
        );
        assert_eq!(allocator.available_seats("A").unwrap(), 0);
    }

    // Documented quirk: a full section under the cursor is not skipped, even
    // though the next section still has free seats.
    #[test]
    fn full_target_section_does_not_fall_through() {
        let allocator = allocator(&[("A", 1), ("B", 2)]);
        allocator.assign_seat().unwrap();
        allocator.assign_seat().unwrap();

        let err = allocator.assign_seat().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoSeatsAvailable);
        assert_eq!(allocator.available_seats("B").unwrap(), 1);
        // The cursor only moves on success.
        assert_eq!(allocator.next_section(), "A");
    }

    #[test]
    fn released_seat_is_reassigned() {
        let allocator = allocator(&[("A", 2)]);
        let first = allocator.assign_seat().unwrap();
        allocator.assign_seat().unwrap();

        allocator.release_seat(first.number, &first.section).unwrap();
        assert_eq!(allocator.seat_state(&first), Some(SeatState::Available));
        assert_eq!(allocator.assign_seat().unwrap(), first);
    }

    #[test]
    fn releasing_a_free_seat_fails() {
        let allocator = allocator(&[("A", 2)]);
        let seat = allocator.assign_seat().unwrap();
        allocator.release_seat(seat.number, "A").unwrap();

        assert_eq!(
            allocator.release_seat(seat.number, "A").unwrap_err(),
            Error::SeatNotAssigned {
                section: "A".into(),
                seat: 1
            }
        );
        assert_eq!(
            allocator.release_seat(0, "A").unwrap_err().kind(),
            ErrorKind::SeatNotAssigned
        );
        assert_eq!(
            allocator.release_seat(99, "A").unwrap_err().kind(),
            ErrorKind::SeatNotAssigned
        );
        assert_eq!(
            allocator.release_seat(1, "Z").unwrap_err().kind(),
            ErrorKind::SectionNotFound
        );
    }

    #[test]
    fn modify_moves_the_occupant() {
        let allocator = allocator(&[("A", 3), ("B", 3)]);
        let seat = allocator.assign_seat().unwrap();

        allocator.modify_seat(seat.number, "A", 3, "B").unwrap();
        assert_eq!(allocator.seat_state(&seat), Some(SeatState::Available));
        assert_eq!(
            allocator.seat_state(&SeatRef::new("B", 3)),
            Some(SeatState::Assigned)
        );
        assert_eq!(allocator.assigned_seats(), vec![SeatRef::new("B", 3)]);
    }

    #[test]
    fn failed_modify_leaves_both_seats_untouched() {
        let allocator = allocator(&[("A", 3), ("B", 3)]);
        let a1 = allocator.assign_seat().unwrap();
        let b1 = allocator.assign_seat().unwrap();

        let cases = [
            ((1, "Z", 2, "A"), ErrorKind::SectionNotFound),
            ((1, "A", 2, "Z"), ErrorKind::SectionNotFound),
            ((2, "A", 3, "A"), ErrorKind::SeatNotAssigned),
            ((1, "A", 1, "B"), ErrorKind::SeatUnavailable),
            ((1, "A", 1, "A"), ErrorKind::SeatUnavailable),
            ((1, "A", 0, "B"), ErrorKind::SeatUnavailable),
            ((1, "A", 4, "B"), ErrorKind::SeatUnavailable),
        ];
        for ((seat, section, new_seat, new_section), kind) in cases {
            let err = allocator
                .modify_seat(seat, section, new_seat, new_section)
                .unwrap_err();
            assert_eq!(err.kind(), kind, "{section}{seat} -> {new_section}{new_seat}");
        }

        assert_eq!(allocator.assigned_seats(), vec![a1, b1]);
    }

    #[test]
    fn concurrent_assignments_never_hand_out_a_seat_twice() {
        let allocator = allocator(&[("A", 64), ("B", 64)]);
        let results = std::sync::Mutex::new(Vec::new());

        scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    let mut mine = Vec::new();
                    for _ in 0..32 {
                        if let Ok(seat) = allocator.assign_seat() {
                            mine.push(seat);
                        }
                    }
                    results.lock().unwrap().extend(mine);
                });
            }
        });

        let mut seats = results.into_inner().unwrap();
        let total = seats.len();
        seats.sort_by(|a, b| (&a.section, a.number).cmp(&(&b.section, b.number)));
        seats.dedup();
        assert_eq!(seats.len(), total);
        assert_eq!(allocator.assigned_seats().len(), total);
    }

    #[test]
    fn concurrent_moves_keep_occupancy_constant() {
        let allocator = allocator(&[("A", 16), ("B", 16)]);
        for _ in 0..8 {
            allocator.assign_seat().unwrap();
        }
        let occupied = allocator.assigned_seats().len();

        scope(|s| {
            for t in 0..4u32 {
                let allocator = &allocator;
                s.spawn(move || {
                    for i in 0..200u32 {
                        let seat = 1 + (i + t) % 16;
                        let new_seat = 1 + (i * 7 + t) % 16;
                        // Most attempts fail; only the occupancy count matters.
                        let _ = allocator.modify_seat(seat, "A", new_seat, "B");
                        let _ = allocator.modify_seat(new_seat, "B", seat, "A");
                        assert_eq!(allocator.assigned_seats().len(), occupied);
                    }
                });
            }
        });

        assert_eq!(allocator.assigned_seats().len(), occupied);
    }
}
