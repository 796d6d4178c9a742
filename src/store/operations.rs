use log::{debug, info, warn};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::records::ids::{self, IdGenerator, RandomIds};
use crate::records::validation::{normalize_class, normalize_name, validate_score};
use crate::records::{StudentId, StudentRecord, Subject};
use super::layout::StoreLayout;
use super::loader::StoreLoader;
use super::report::{class_listing, ClassListing, ReportCard};
use super::types::{LoadStats, SchoolStore, WriteStats};
use super::writer::StoreWriter;

/// Mutations and queries over the school store.
///
/// Every successful mutation rewrites all derived files. If that rewrite fails
/// the in-memory change is kept and the error is returned.
#[derive(Debug)]
pub struct SchoolOperations {
    /// Where the store lives
    layout: StoreLayout,

    /// Optional first line of generated files
    header: Option<String>,

    /// The loaded state
    store: SchoolStore,

    /// Source of new identifiers
    ids: Box<dyn IdGenerator>,

    /// Statistics of the initial load
    load_stats: LoadStats,
}

impl SchoolOperations {
    /// Load the store described by the config with random identifiers
    pub fn open(config: &StoreConfig) -> StoreResult<Self> {
        Self::open_with_ids(config, Box::new(RandomIds))
    }

    /// Load the store and bring the class files in line with it
    pub fn open_with_ids(config: &StoreConfig, ids: Box<dyn IdGenerator>) -> StoreResult<Self> {
        config.validate()?;
        let layout = config.layout();
        let (store, load_stats) = StoreLoader::new(&layout, config.load_mode()).load()?;

        let ops = Self {
            layout,
            header: config.header.clone(),
            store,
            ids,
            load_stats,
        };

        let stats = ops.writer().write_class_files(&ops.store)?;
        debug!("Class files refreshed after load: {:?}", stats);
        Ok(ops)
    }

    pub fn store(&self) -> &SchoolStore {
        &self.store
    }

    pub fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    pub fn load_stats(&self) -> &LoadStats {
        &self.load_stats
    }

    fn writer(&self) -> StoreWriter<'_> {
        StoreWriter::new(&self.layout, self.header.as_deref())
    }

    /// Regenerate every derived file from memory
    pub fn save(&self) -> StoreResult<WriteStats> {
        Ok(self.writer().write_all(&self.store)?)
    }

    /// Register a new student and return the allocated identifier
    pub fn register(&mut self, name: &str, class_name: &str) -> StoreResult<StudentId> {
        let name = normalize_name(name)?;
        let class_name = normalize_class(class_name)?;

        let id = ids::allocate(&mut *self.ids, &self.store.directory);
        self.store.add_student(id.clone(), StudentRecord {
            name: name.clone(),
            class_name: class_name.clone(),
        });
        info!("Registered {} ({}) in class {}", name, id, class_name);

        self.save()?;
        Ok(id)
    }

    /// Record the mean of two partial scores for a subject, returning that mean
    pub fn record_grade(&mut self, id: &str, subject: Subject, score1: f64, score2: f64) -> StoreResult<f64> {
        let id = self.existing_id(id)?;
        let score1 = validate_score(score1)?;
        let score2 = validate_score(score2)?;

        let average = (score1 + score2) / 2.0;
        self.store.grades.set_score(&id, subject, Some(average));
        info!("Recorded {} = {:.2} for {}", subject, average, id);

        self.save()?;
        Ok(average)
    }

    /// Remove a student with all of its grades
    pub fn remove(&mut self, id: &str) -> StoreResult<StudentRecord> {
        let id = self.existing_id(id)?;
        let record = self
            .store
            .remove_student(&id)
            .ok_or_else(|| StoreError::StudentNotFound(id.clone()))?;
        info!("Removed {} ({})", record.name, id);

        self.save()?;
        Ok(record)
    }

    /// Clear all students and grades and delete every generated file.
    ///
    /// Returns the number of files deleted.
    pub fn reset_all(&mut self) -> StoreResult<usize> {
        warn!("Resetting the school store");
        self.store.clear();
        Ok(self.writer().remove_generated_files()?)
    }

    pub fn report_card(&self, id: &str) -> StoreResult<ReportCard> {
        let id = self.existing_id(id)?;
        ReportCard::build(&self.store, &id).ok_or(StoreError::StudentNotFound(id))
    }

    pub fn class_listing(&self) -> Vec<ClassListing> {
        class_listing(&self.store)
    }

    fn existing_id(&self, raw: &str) -> StoreResult<StudentId> {
        let id = StudentId::new(raw);
        if !self.store.directory.contains(&id) {
            return Err(StoreError::StudentNotFound(id));
        }
        Ok(id)
    }
}
