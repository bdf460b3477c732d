/// `count` card slots, each of which may be filled from any of `indices`.
#[derive(Debug, Clone, Copy)]
pub struct SlotDemand<'a> {
    pub indices: &'a [usize],
    pub count: u32,
}

#[derive(Debug, Clone, Copy)]
struct Slot<'a> {
    demand: usize,
    indices: &'a [usize],
}

/// Fills every slot of every demand from `supply`, one unit per slot.
///
/// On success the consumed units stay taken from `supply` and are added to
/// `used`. On failure both buffers are left exactly as they were passed in.
pub fn assign_slots(demands: &[SlotDemand<'_>], supply: &mut [u32], used: &mut [u32]) -> bool {
    for demand in demands {
        if demand.count == 0 {
            continue;
        }
        let reachable = demand
            .indices
            .iter()
            .fold(0u64, |sum, &index| sum + u64::from(supply.get(index).copied().unwrap_or(0)));
        if reachable < u64::from(demand.count) {
            return false;
        }
    }

    let mut slots = Vec::new();
    for (demand, entry) in demands.iter().enumerate() {
        for _ in 0..entry.count {
            slots.push(Slot {
                demand,
                indices: entry.indices,
            });
        }
    }
    search(&slots, 0, 0, supply, used)
}

// Slots of one demand are interchangeable, so each picks at or after the
// position its predecessor picked; this visits every multiset once.
fn search(
    slots: &[Slot<'_>],
    position: usize,
    floor: usize,
    supply: &mut [u32],
    used: &mut [u32],
) -> bool {
    let Some(slot) = slots.get(position) else {
        return true;
    };
    for (offset, &index) in slot.indices.iter().enumerate().skip(floor) {
        if supply.get(index).copied().unwrap_or(0) == 0 || index >= used.len() {
            continue;
        }
        supply[index] -= 1;
        used[index] += 1;
        let next_floor = match slots.get(position + 1) {
            Some(next) if next.demand == slot.demand => offset,
            _ => 0,
        };
        if search(slots, position + 1, next_floor, supply, used) {
            return true;
        }
        supply[index] += 1;
        used[index] -= 1;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn competing_demands_find_the_disjoint_assignment() {
        // first demand would greedily grab index 0, which the second needs
        let either = [0, 1];
        let only_zero = [0];
        let demands = [
            SlotDemand {
                indices: &either,
                count: 1,
            },
            SlotDemand {
                indices: &only_zero,
                count: 1,
            },
        ];
        let mut supply = vec![1, 1];
        let mut used = vec![0, 0];
        assert!(assign_slots(&demands, &mut supply, &mut used));
        assert_eq!(supply, vec![0, 0]);
        assert_eq!(used, vec![1, 1]);
    }

    #[test]
    fn failure_restores_buffers() {
        let shared = [0];
        let demands = [
            SlotDemand {
                indices: &shared,
                count: 1,
            },
            SlotDemand {
                indices: &shared,
                count: 1,
            },
        ];
        let mut supply = vec![1];
        let mut used = vec![0];
        assert!(!assign_slots(&demands, &mut supply, &mut used));
        assert_eq!(supply, vec![1]);
        assert_eq!(used, vec![0]);
    }

    #[test]
    fn repeated_slots_may_reuse_an_index() {
        let indices = [0, 1];
        let demands = [SlotDemand {
            indices: &indices,
            count: 3,
        }];
        let mut supply = vec![2, 1];
        let mut used = vec![0, 0];
        assert!(assign_slots(&demands, &mut supply, &mut used));
        assert_eq!(used, vec![2, 1]);
    }

    #[test]
    fn empty_index_set_cannot_fill_a_slot() {
        let demands = [SlotDemand {
            indices: &[],
            count: 1,
        }];
        let mut supply = vec![3];
        let mut used = vec![0];
        assert!(!assign_slots(&demands, &mut supply, &mut used));
    }

    #[test]
    fn zero_count_demand_is_vacuous() {
        let demands = [SlotDemand {
            indices: &[],
            count: 0,
        }];
        assert!(assign_slots(&demands, &mut [], &mut []));
    }
}
