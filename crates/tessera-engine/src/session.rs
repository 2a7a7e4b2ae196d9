//! One user's editing session over one loaded model.

use tessera_ir::{MaterialId, MaterialSpec, ModelRef, PartId, ProjectRecord};
use tessera_pick::{Camera, PickIndex, PickResult, Ray};
use tessera_scene::{Part, SceneAdapter, SceneError};
use tracing::{debug, info, warn};

use crate::area::AreaCache;
use crate::catalog::{Catalog, MemoryCatalog};
use crate::config::EngineConfig;
use crate::overrides::{OverrideStore, Snapshot};
use crate::pricing::{compute_total, PriceResult};
use crate::serializer::{from_record, overwrite, to_record, RecordMeta, RestoredOverrides};
use crate::{EngineError, Result};

/// Handle for one model load. Only the most recently issued ticket may
/// install its scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(u64);

struct LoadedModel {
    scene: Box<dyn SceneAdapter>,
    index: PickIndex,
    store: OverrideStore,
    areas: AreaCache,
    priced: Option<(u64, PriceResult)>,
}

impl LoadedModel {
    fn new(scene: Box<dyn SceneAdapter>, config: &EngineConfig) -> Self {
        Self {
            index: PickIndex::build(scene.list_parts()),
            store: OverrideStore::for_scene(scene.as_ref()),
            areas: AreaCache::new(config.area_method),
            priced: None,
            scene,
        }
    }
}

/// Picking, material assignment, pricing and persistence for the UI.
///
/// Everything except loading fails with [`EngineError::NoModel`] until a
/// model has been installed.
pub struct Session<C: Catalog = MemoryCatalog> {
    config: EngineConfig,
    catalog: C,
    latest_ticket: u64,
    model: Option<LoadedModel>,
}

impl<C: Catalog> Session<C> {
    /// Session with nothing loaded.
    pub fn new(config: EngineConfig, catalog: C) -> Self {
        Self {
            config,
            catalog,
            latest_ticket: 0,
            model: None,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Material catalog.
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Start a model load. Supersedes any load still in flight.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.latest_ticket += 1;
        LoadTicket(self.latest_ticket)
    }

    /// Install `scene` if `ticket` is the newest load.
    ///
    /// A superseded load is dropped and leaves the current model, its
    /// overrides and its history untouched. Returns whether the scene was
    /// installed.
    pub fn finish_load(&mut self, ticket: LoadTicket, scene: impl SceneAdapter + 'static) -> bool {
        if ticket.0 != self.latest_ticket {
            info!(
                ticket = ticket.0,
                latest = self.latest_ticket,
                model = %scene.model_ref(),
                "dropping superseded model load"
            );
            return false;
        }
        info!(
            model = %scene.model_ref(),
            parts = scene.list_parts().len(),
            "model loaded"
        );
        self.model = Some(LoadedModel::new(Box::new(scene), &self.config));
        true
    }

    /// Begin and immediately finish a load.
    pub fn load(&mut self, scene: impl SceneAdapter + 'static) {
        let ticket = self.begin_load();
        self.finish_load(ticket, scene);
    }

    /// True once a model is installed.
    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    fn model(&self) -> Result<&LoadedModel> {
        self.model.as_ref().ok_or(EngineError::NoModel)
    }

    fn model_mut(&mut self) -> Result<&mut LoadedModel> {
        self.model.as_mut().ok_or(EngineError::NoModel)
    }

    /// Identity of the loaded model.
    pub fn model_ref(&self) -> Result<&ModelRef> {
        Ok(self.model()?.scene.model_ref())
    }

    /// Pickable parts of the loaded model.
    pub fn parts(&self) -> Result<&[Part]> {
        Ok(self.model()?.scene.list_parts())
    }

    /// Look up a part that is expected to exist.
    pub fn part(&self, id: &PartId) -> Result<&Part> {
        self.model()?
            .scene
            .get_part(id)
            .map_err(|SceneError::NotFound(id)| EngineError::NotFound(id))
    }

    /// Nearest part under `ray`. `None` means deselect.
    pub fn pick(&self, ray: &Ray) -> Result<Option<PickResult>> {
        let hit = self.model()?.index.pick(ray, self.config.pick_epsilon);
        debug!(hit = ?hit.as_ref().map(|h| h.part_id.as_str()), "pick");
        Ok(hit)
    }

    /// Nearest part under a pointer at pixel `(px, py)` of a `width` × `height` viewport.
    pub fn pick_pointer(
        &self,
        camera: &Camera,
        px: f64,
        py: f64,
        width: f64,
        height: f64,
    ) -> Result<Option<PickResult>> {
        self.model()?;
        let ray = camera.ray_from_pixel(px, py, width, height)?;
        self.pick(&ray)
    }

    /// Apply the catalog material `material` to `part`.
    pub fn apply(&mut self, part: &PartId, material: &MaterialId) -> Result<Snapshot> {
        self.model()?;
        let spec = self.catalog.resolve(material)?;
        self.apply_spec(part, spec)
    }

    /// Apply an already-resolved material to `part`.
    pub fn apply_spec(&mut self, part: &PartId, spec: MaterialSpec) -> Result<Snapshot> {
        self.model_mut()?.store.apply(part, spec)
    }

    /// Clear the override on `part`. `None` if there was none.
    pub fn remove(&mut self, part: &PartId) -> Result<Option<Snapshot>> {
        Ok(self.model_mut()?.store.remove(part))
    }

    /// Step back in history. Returns whether anything changed.
    pub fn undo(&mut self) -> Result<bool> {
        Ok(self.model_mut()?.store.undo())
    }

    /// Step forward in history. Returns whether anything changed.
    pub fn redo(&mut self) -> Result<bool> {
        Ok(self.model_mut()?.store.redo())
    }

    /// True if undo would change state.
    pub fn can_undo(&self) -> Result<bool> {
        Ok(self.model()?.store.can_undo())
    }

    /// True if redo would change state.
    pub fn can_redo(&self) -> Result<bool> {
        Ok(self.model()?.store.can_redo())
    }

    /// Current override snapshot.
    pub fn current(&self) -> Result<Snapshot> {
        Ok(self.model()?.store.current())
    }

    /// Store revision; changes whenever [`Session::current`] does.
    pub fn revision(&self) -> Result<u64> {
        Ok(self.model()?.store.revision())
    }

    /// Surface area of `part`, 0 if it is not in the scene.
    pub fn area(&mut self, part: &PartId) -> Result<f64> {
        let model = self.model_mut()?;
        Ok(model.areas.area(model.scene.as_ref(), part))
    }

    /// Compute every part area up front, in parallel.
    pub fn warm_areas(&mut self) -> Result<()> {
        let model = self.model_mut()?;
        model.areas.warm(model.scene.list_parts());
        Ok(())
    }

    /// Price the current overrides.
    ///
    /// Recomputed only when the store revision has moved since the last call.
    pub fn price(&mut self) -> Result<&PriceResult> {
        let catalog = &self.catalog;
        let LoadedModel {
            scene,
            store,
            areas,
            priced,
            ..
        } = self.model.as_mut().ok_or(EngineError::NoModel)?;

        let revision = store.revision();
        if matches!(priced, Some((rev, _)) if *rev != revision) {
            *priced = None;
        }
        let (_, result) = priced.get_or_insert_with(|| {
            let snapshot = store.current();
            let result = compute_total(&snapshot, |p| areas.area(&**scene, p), catalog);
            debug!(revision, total = result.total, "priced overrides");
            (revision, result)
        });
        Ok(&*result)
    }

    /// Write the current overrides as a new record.
    pub fn save(&mut self, project_name: &str) -> Result<ProjectRecord> {
        let total = self.price()?.total;
        let model = self.model()?;
        let record = to_record(
            &model.store.current(),
            model.scene.model_ref(),
            RecordMeta::now(project_name, total),
        )?;
        info!(project = %record.project_name, selections = record.selections.len(), "project saved");
        Ok(record)
    }

    /// Overwrite `existing` with the current overrides, keeping its name
    /// and creation time.
    pub fn save_over(&mut self, existing: &ProjectRecord) -> Result<ProjectRecord> {
        let total = self.price()?.total;
        let model = self.model()?;
        if &existing.model_ref != model.scene.model_ref() {
            return Err(EngineError::ModelMismatch {
                expected: model.scene.model_ref().clone(),
                found: existing.model_ref.clone(),
            });
        }
        overwrite(
            existing,
            &model.store.current(),
            model.scene.model_ref(),
            RecordMeta::now(existing.project_name.clone(), total),
        )
    }

    /// Replace the session's overrides with those saved in `record`.
    ///
    /// History restarts: the restored mapping is a single entry after the
    /// empty initial state. Selections for parts missing from the scene are
    /// kept and price at zero.
    pub fn restore(&mut self, record: &ProjectRecord) -> Result<RestoredOverrides> {
        let policy = self.config.record_policy;
        let model = self.model.as_mut().ok_or(EngineError::NoModel)?;
        if &record.model_ref != model.scene.model_ref() {
            return Err(EngineError::ModelMismatch {
                expected: model.scene.model_ref().clone(),
                found: record.model_ref.clone(),
            });
        }
        let restored = from_record(record, &self.catalog, policy)?;

        for part in restored.mapping.part_ids().filter(|p| !model.store.accepts(p)) {
            warn!(project = %record.project_name, part = %part, "restored override for part not in scene");
        }
        model.store.reset(restored.mapping.clone());
        model.priced = None;

        info!(
            project = %record.project_name,
            restored = restored.mapping.len(),
            dropped = restored.dropped.len(),
            "project restored"
        );
        Ok(restored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RecordPolicy;
    use approx::assert_relative_eq;
    use tessera_math::{Point3, Transform, Vec3};
    use tessera_scene::{cuboid, MemoryScene};

    fn catalog() -> MemoryCatalog {
        MemoryCatalog::new(vec![
            MaterialSpec::new("paint", "Paint", 10.0),
            MaterialSpec::new("oak", "Oak", 80.0),
        ])
        .unwrap()
    }

    /// Unit cube "near" in front of a doubled cube "far", both on the Z axis.
    fn scene(model: &str) -> MemoryScene {
        MemoryScene::new(
            model,
            vec![
                Part::new("near", cuboid(1.0, 1.0, 1.0)).with_transform(Transform::translation(0.0, 0.0, 2.0)),
                Part::new("far", cuboid(1.0, 1.0, 1.0))
                    .with_transform(Transform::translation(0.0, 0.0, -4.0).then(&Transform::uniform_scale(2.0))),
            ],
        )
    }

    fn session() -> Session {
        let mut s = Session::new(EngineConfig::default(), catalog());
        s.load(scene("mem://house"));
        s
    }

    fn down_z() -> Ray {
        Ray::new(Point3::new(0.3, 0.6, 10.0), Vec3::new(0.0, 0.0, -1.0)).unwrap()
    }

    #[test]
    fn test_everything_fails_before_load() {
        let mut s: Session = Session::new(EngineConfig::default(), catalog());
        assert!(matches!(s.pick(&down_z()), Err(EngineError::NoModel)));
        assert!(matches!(s.apply(&"near".into(), &"oak".into()), Err(EngineError::NoModel)));
        assert!(matches!(s.undo(), Err(EngineError::NoModel)));
        assert!(matches!(s.price(), Err(EngineError::NoModel)));
        assert!(matches!(s.save("x"), Err(EngineError::NoModel)));
        assert!(matches!(s.current(), Err(EngineError::NoModel)));
    }

    #[test]
    fn test_pick_returns_nearest_part() {
        let s = session();
        let hit = s.pick(&down_z()).unwrap().unwrap();
        assert_eq!(hit.part_id.as_str(), "near");
        assert_relative_eq!(hit.hit_distance, 7.0, epsilon = 1e-9);

        let miss = Ray::new(Point3::new(50.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0)).unwrap();
        assert!(s.pick(&miss).unwrap().is_none());
    }

    #[test]
    fn test_pick_pointer_through_viewport_centre() {
        let s = session();
        let camera = Camera::look_at(Point3::new(0.3, 0.6, 10.0), Point3::new(0.3, 0.6, 0.0), 45.0, 1.5);
        let hit = s.pick_pointer(&camera, 600.0, 400.0, 1200.0, 800.0).unwrap().unwrap();
        assert_eq!(hit.part_id.as_str(), "near");
    }

    #[test]
    fn test_apply_resolves_through_catalog() {
        let mut s = session();
        assert!(matches!(
            s.apply(&"near".into(), &"granite".into()),
            Err(EngineError::UnknownMaterial(_))
        ));
        assert!(matches!(
            s.apply(&"chimney".into(), &"oak".into()),
            Err(EngineError::UnknownPart(_))
        ));
        assert!(!s.can_undo().unwrap());

        let snap = s.apply(&"near".into(), &"oak".into()).unwrap();
        assert_eq!(snap.get(&"near".into()).unwrap().name, "Oak");
    }

    #[test]
    fn test_price_follows_history() {
        let mut s = session();
        s.apply(&"near".into(), &"paint".into()).unwrap();
        assert_relative_eq!(s.price().unwrap().total, 60.0, epsilon = 1e-9);

        s.apply(&"far".into(), &"paint".into()).unwrap();
        assert_relative_eq!(s.price().unwrap().total, 60.0 + 240.0, epsilon = 1e-9);

        s.undo().unwrap();
        assert_relative_eq!(s.price().unwrap().total, 60.0, epsilon = 1e-9);
        s.redo().unwrap();
        assert_relative_eq!(s.price().unwrap().total, 300.0, epsilon = 1e-9);
    }

    #[test]
    fn test_superseded_load_is_dropped() {
        let mut s = session();
        s.apply(&"near".into(), &"oak".into()).unwrap();

        let slow = s.begin_load();
        let fast = s.begin_load();
        assert!(s.finish_load(fast, scene("mem://annex")));
        assert!(!s.finish_load(slow, scene("mem://stale")));
        assert_eq!(s.model_ref().unwrap().as_str(), "mem://annex");
        assert!(s.current().unwrap().is_empty());
        assert!(!s.can_undo().unwrap());
    }

    #[test]
    fn test_stale_load_keeps_current_history() {
        let mut s = session();
        let stale = s.begin_load();
        s.apply(&"near".into(), &"oak".into()).unwrap();
        let _newer = s.begin_load();
        assert!(!s.finish_load(stale, scene("mem://old")));
        assert_eq!(s.model_ref().unwrap().as_str(), "mem://house");
        assert!(s.can_undo().unwrap());
    }

    #[test]
    fn test_save_then_restore_round_trips() {
        let mut s = session();
        s.apply(&"far".into(), &"oak".into()).unwrap();
        s.apply(&"near".into(), &"paint".into()).unwrap();
        let record = s.save("House").unwrap();
        assert_relative_eq!(record.total_price, 24.0 * 80.0 + 60.0, epsilon = 1e-9);

        let mut fresh = session();
        let restored = fresh.restore(&record).unwrap();
        assert!(restored.dropped.is_empty());
        assert_eq!(*fresh.current().unwrap(), *s.current().unwrap());
        assert_relative_eq!(fresh.price().unwrap().total, record.total_price, epsilon = 1e-9);
        assert!(fresh.undo().unwrap());
        assert!(fresh.current().unwrap().is_empty());
    }

    #[test]
    fn test_restore_refreshes_cached_price() {
        let mut s = session();
        s.apply(&"near".into(), &"oak".into()).unwrap();
        let record = s.save("One").unwrap();
        s.undo().unwrap();
        s.apply(&"far".into(), &"paint".into()).unwrap();
        assert_relative_eq!(s.price().unwrap().total, 240.0, epsilon = 1e-9);

        s.restore(&record).unwrap();
        assert_relative_eq!(s.price().unwrap().total, 480.0, epsilon = 1e-9);
    }

    #[test]
    fn test_revision_keeps_rising_across_restore() {
        let mut s = session();
        s.apply(&"near".into(), &"oak".into()).unwrap();
        let record = s.save("One").unwrap();
        s.undo().unwrap();
        s.apply(&"far".into(), &"paint".into()).unwrap();
        s.apply(&"far".into(), &"oak".into()).unwrap();
        let before = s.revision().unwrap();
        assert_eq!(before, 4);

        s.restore(&record).unwrap();
        let after = s.revision().unwrap();
        assert!(after > before, "revision went from {before} to {after}");
        assert!(s.current().unwrap().contains(&"near".into()));

        assert!(s.undo().unwrap());
        assert!(s.revision().unwrap() > after);
    }

    #[test]
    fn test_restore_rejects_other_model() {
        let mut s = session();
        let record = s.save("House").unwrap();
        let mut other = Session::new(EngineConfig::default(), catalog());
        other.load(scene("mem://shed"));
        assert!(matches!(other.restore(&record), Err(EngineError::ModelMismatch { .. })));
    }

    #[test]
    fn test_restore_keeps_stale_parts_at_zero_area() {
        let mut s = session();
        let mut record = s.save("House").unwrap();
        record.selections.push(tessera_ir::Selection::new("demolished", "oak"));
        let restored = s.restore(&record).unwrap();
        assert!(restored.mapping.contains(&"demolished".into()));
        let price = s.price().unwrap();
        assert_eq!(price.line(&"demolished".into()).unwrap().area, 0.0);
        assert_eq!(price.total, 0.0);
    }

    #[test]
    fn test_strict_policy_aborts_restore() {
        let config = EngineConfig {
            record_policy: RecordPolicy::Strict,
            ..EngineConfig::default()
        };
        let mut s = Session::new(config, catalog());
        s.load(scene("mem://house"));
        let mut record = s.save("House").unwrap();
        record.selections.push(tessera_ir::Selection::new("near", "granite"));
        assert!(matches!(s.restore(&record), Err(EngineError::CorruptRecord { .. })));
        assert!(s.current().unwrap().is_empty());
    }

    #[test]
    fn test_save_over_keeps_identity() {
        let mut s = session();
        let first = s.save("House").unwrap();
        s.apply(&"near".into(), &"oak".into()).unwrap();
        let second = s.save_over(&first).unwrap();
        assert_eq!(second.created_at, first.created_at);
        assert_eq!(second.project_name, "House");
        assert_eq!(second.selections.len(), 1);
    }

    #[test]
    fn test_part_lookup_maps_to_not_found() {
        let s = session();
        assert!(s.part(&"near".into()).is_ok());
        assert!(matches!(s.part(&"ghost".into()), Err(EngineError::NotFound(_))));
    }
}
