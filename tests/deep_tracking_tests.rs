use memotrack::tracking::{DeepAccessor, DeepRegistry, PropertyBindings, TrackerSlot, entity_is_dirty};
use memotrack::{ChangeTracking, DirtyCheck, Trackable, TrackableList, tracked_struct};

tracked_struct! {
    pub struct Bin {
        label: String,
    }
}

tracked_struct! {
    pub struct Shelf {
        code: String,
        #[track(deep)]
        bin: Option<Bin>,
    }
}

tracked_struct! {
    pub struct Warehouse {
        city: String,
        #[track(deep)]
        shelf: Shelf,
    }
}

tracked_struct! {
    pub struct Line {
        sku: String,
        quantity: u32,
    }
}

tracked_struct! {
    pub struct Invoice {
        number: u64,
        #[track(deep)]
        lines: TrackableList<Line>,
    }
}

fn warehouse() -> Warehouse {
    let shelf = Shelf::new("S-1".to_string(), Some(Bin::new("B-1".to_string())));
    let warehouse = Warehouse::new("Oslo".to_string(), shelf);
    warehouse.track();
    warehouse.shelf().track();
    if let Some(bin) = warehouse.shelf().bin() {
        bin.track();
    }
    warehouse
}

#[test]
fn test_nested_change_is_visible_only_to_deep_check() {
    let mut warehouse = warehouse();
    warehouse.shelf_mut().set_code("S-2".to_string());

    assert!(!warehouse.is_dirty(false));
    assert!(warehouse.is_dirty(true));
    assert!(warehouse.is_dirty_deep());
    assert!(warehouse.shelf().is_dirty(false));
}

#[test]
fn test_deep_check_is_transitive() {
    let mut warehouse = warehouse();
    assert!(!warehouse.is_dirty(true));

    if let Some(bin) = warehouse.shelf_mut().bin_mut() {
        bin.set_label("B-9".to_string());
    }

    assert!(!warehouse.shelf().is_dirty(false));
    assert!(warehouse.shelf().is_dirty(true));
    assert!(warehouse.is_dirty(true));
}

#[test]
fn test_absent_nested_value_is_clean() {
    let shelf = Shelf::new("S-1".to_string(), None);
    shelf.track();

    assert!(!shelf.is_dirty(true));
}

#[test]
fn test_nested_rollback_clears_deep_dirtiness() {
    let mut warehouse = warehouse();
    warehouse.shelf_mut().set_code("S-2".to_string());
    warehouse.shelf_mut().rollback_changes();

    assert_eq!(warehouse.shelf().code(), "S-1");
    assert!(!warehouse.is_dirty(true));
}

#[test]
fn test_untracked_owner_still_reports_nested_changes() {
    let shelf = Shelf::new("S-1".to_string(), Some(Bin::new("B-1".to_string())));
    let mut warehouse = Warehouse::new("Oslo".to_string(), shelf);
    warehouse.shelf().track();
    warehouse.shelf_mut().set_code("S-3".to_string());

    assert!(warehouse.try_tracker().is_none());
    assert!(warehouse.is_dirty(true));
}

#[test]
fn test_collection_field_propagates_structural_and_element_changes() {
    let invoice = Invoice::new(
        7,
        TrackableList::from_vec(vec![Line::new("apple".to_string(), 1)]),
    );
    invoice.track();
    assert!(!invoice.is_dirty(true));

    let mut edited = invoice.clone();
    edited.track();
    if let Some(mut line) = edited.lines_mut().get_mut(0) {
        line.set_quantity(3);
    }
    assert!(!edited.is_dirty(false));
    assert!(!edited.lines().is_dirty(false));
    assert!(edited.is_dirty(true));

    let mut grown = invoice.clone();
    grown.track();
    grown.lines_mut().push(Line::new("pear".to_string(), 2));
    assert!(grown.lines().is_dirty(false));
    assert!(grown.is_dirty(true));
    assert!(!grown.is_dirty(false));
}

struct Pallet {
    lid: Bin,
    tracker: TrackerSlot,
}

impl DirtyCheck for Pallet {
    fn is_dirty(&self, deep: bool) -> bool {
        entity_is_dirty(self, deep)
    }
}

impl Trackable for Pallet {
    fn tracker_slot(&self) -> &TrackerSlot {
        &self.tracker
    }

    fn tracker_slot_mut(&mut self) -> &mut TrackerSlot {
        &mut self.tracker
    }

    fn bind_properties(_bindings: &mut PropertyBindings<Self>) {}
}

fn lid_accessor(entity: &Pallet) -> Option<&dyn DirtyCheck> {
    Some(&entity.lid)
}

fn no_accessor(_entity: &Pallet) -> Option<&dyn DirtyCheck> {
    None
}

#[test]
fn test_first_registration_wins() {
    let mut pallet = Pallet {
        lid: Bin::new("L-1".to_string()),
        tracker: TrackerSlot::new(),
    };
    pallet.lid.track();
    pallet.lid.set_label("L-2".to_string());

    assert!(!pallet.is_dirty(true));

    assert!(DeepRegistry::set_accessors::<Pallet>(vec![lid_accessor as DeepAccessor<Pallet>]));
    assert!(!DeepRegistry::set_accessors::<Pallet>(vec![no_accessor as DeepAccessor<Pallet>]));
    assert!(DeepRegistry::is_registered::<Pallet>());

    assert!(pallet.is_dirty(true));
    assert!(!pallet.is_dirty(false));
}
