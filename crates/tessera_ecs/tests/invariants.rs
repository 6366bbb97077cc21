//! # Randomized Invariant Tests
//!
//! Long, seeded sequences of mutations checked against a simple model
//! after every step:
//!
//! - Storage size equals the number of entities holding the component
//! - Lookups return the most recently assigned value
//! - An entity is in a system's set iff its signature satisfies the system's
//!
//! Seeds are fixed, so failures reproduce exactly.

use std::collections::{BTreeSet, HashMap};

use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tessera_ecs::{
    ComponentId, ComponentStorage, Controller, EcsConfig, EntityId, Signature, System,
    SystemContext, SystemId,
};

const STEPS: usize = 20_000;

#[test]
fn storage_matches_model_under_random_ops() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x7E55_E2A);
    let mut storage: ComponentStorage<u64> = ComponentStorage::new(256);
    let mut model: HashMap<EntityId, u64> = HashMap::new();

    for step in 0..STEPS {
        let entity = EntityId::new(rng.gen_range(0..64));
        if rng.gen_bool(0.55) {
            let value: u64 = rng.gen();
            let previous = storage.add(entity, value);
            assert_eq!(previous, model.insert(entity, value), "step {step}");
        } else {
            let removed = storage.remove(entity);
            assert_eq!(removed, model.remove(&entity).is_some(), "step {step}");
        }

        assert_eq!(storage.len(), model.len(), "step {step}");
        for (entity, value) in &model {
            assert_eq!(storage.get(*entity), Some(value), "step {step}");
        }

        // Active slots hold exactly the modelled pairs.
        let active: HashMap<EntityId, u64> = storage.iter().map(|(e, v)| (e, *v)).collect();
        assert_eq!(active, model, "step {step}");
    }
}

#[derive(Clone, Copy, Default)]
struct C0;
#[derive(Clone, Copy, Default)]
struct C1;
#[derive(Clone, Copy, Default)]
struct C2;
#[derive(Clone, Copy, Default)]
struct C3;

struct Probe;

impl System for Probe {
    fn update(&mut self, _ctx: &mut SystemContext<'_>, _delta_time: f32) {}
}

struct World {
    ecs: Controller,
    c0: ComponentId<C0>,
    c1: ComponentId<C1>,
    c2: ComponentId<C2>,
    c3: ComponentId<C3>,
    systems: Vec<SystemId<Probe>>,
    live: BTreeSet<EntityId>,
}

impl World {
    fn new() -> Self {
        let config = EcsConfig {
            max_entities: 48,
            max_components: 4,
        };
        let mut ecs = Controller::with_config(config).unwrap();
        let c0 = ecs.register_component::<C0>().unwrap();
        let c1 = ecs.register_component::<C1>().unwrap();
        let c2 = ecs.register_component::<C2>().unwrap();
        let c3 = ecs.register_component::<C3>().unwrap();

        let signatures = [
            Signature::empty().with(c0),
            Signature::empty().with(c0).with(c1),
            Signature::empty().with(c1).with(c2).with(c3),
            Signature::empty(),
        ];
        let systems = signatures
            .into_iter()
            .map(|sig| ecs.register_system(sig, Probe))
            .collect();

        Self {
            ecs,
            c0,
            c1,
            c2,
            c3,
            systems,
            live: BTreeSet::new(),
        }
    }

    fn add(&mut self, entity: EntityId, kind: u32) {
        let mut handle = self.ecs.entity(entity);
        let added = match kind {
            0 => handle.add_default_component(self.c0).map(|_| ()),
            1 => handle.add_default_component(self.c1).map(|_| ()),
            2 => handle.add_default_component(self.c2).map(|_| ()),
            _ => handle.add_default_component(self.c3).map(|_| ()),
        };
        added.unwrap();
    }

    fn remove(&mut self, entity: EntityId, kind: u32) {
        let mut handle = self.ecs.entity(entity);
        let removed = match kind {
            0 => handle.remove_component(self.c0),
            1 => handle.remove_component(self.c1),
            2 => handle.remove_component(self.c2),
            _ => handle.remove_component(self.c3),
        };
        removed.unwrap();
    }

    fn check(&self, step: usize) {
        let systems = self.ecs.systems();
        for &id in &self.systems {
            let required = systems.required_signature(id).unwrap();
            let members = systems.entities(id).unwrap();

            assert!(members.is_subset(&self.live), "step {step}");
            for &entity in &self.live {
                let signature = systems.entity_signature(entity);
                assert_eq!(
                    members.contains(&entity),
                    signature.satisfies(&required),
                    "step {step}, entity {entity}"
                );
            }
        }

        let components = self.ecs.components();
        let holding = |has: &dyn Fn(EntityId) -> bool| self.live.iter().filter(|&&e| has(e)).count();
        assert_eq!(
            components.component_count(self.c0),
            holding(&|e| components.contains_component(e, self.c0))
        );
        assert_eq!(
            components.component_count(self.c3),
            holding(&|e| components.contains_component(e, self.c3))
        );
        assert_eq!(self.ecs.entity_count(), self.live.len(), "step {step}");
    }
}

#[test]
fn membership_matches_signatures_under_random_ops() {
    let mut rng = ChaCha8Rng::seed_from_u64(0xEC5);
    let mut world = World::new();

    for step in 0..STEPS {
        let roll = rng.gen_range(0..100);
        let pick = |rng: &mut ChaCha8Rng, live: &BTreeSet<EntityId>| {
            let n = rng.gen_range(0..live.len());
            live.iter().nth(n).copied()
        };

        if roll < 15 || world.live.is_empty() {
            if let Ok(handle) = world.ecs.create_entity() {
                world.live.insert(handle.id());
            }
        } else if roll < 55 {
            if let Some(entity) = pick(&mut rng, &world.live) {
                let kind = rng.gen_range(0..4);
                world.add(entity, kind);
            }
        } else if roll < 90 {
            if let Some(entity) = pick(&mut rng, &world.live) {
                let kind = rng.gen_range(0..4);
                world.remove(entity, kind);
            }
        } else if let Some(entity) = pick(&mut rng, &world.live) {
            world.ecs.destroy_entity(entity);
            world.live.remove(&entity);
        }

        world.check(step);
    }
}
