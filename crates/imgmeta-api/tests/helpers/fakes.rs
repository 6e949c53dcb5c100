//! Call-counting stand-ins for the image service and the metadata store

use async_trait::async_trait;
use imgmeta_core::models::{ImageRecord, ImageUpdate, NewImage};
use imgmeta_core::AppError;
use imgmeta_db::{ImageRepository, InMemoryImageRepository};
use imgmeta_storage::{ImageServiceError, ImageServiceResult, ImageStorage, RemoteImage};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Image service fake. Ids are `img-<n>` unless a response is queued.
#[derive(Default)]
pub struct FakeImageService {
    create_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    queued: Mutex<VecDeque<RemoteImage>>,
    deleted: Mutex<Vec<String>>,
    fail_create: AtomicBool,
    fail_delete: AtomicBool,
}

impl FakeImageService {
    pub fn respond_with(&self, id: &str, image_url: &str) {
        self.queued.lock().unwrap().push_back(RemoteImage {
            id: id.to_string(),
            image_url: image_url.to_string(),
        });
    }

    pub fn fail_creates(&self) {
        self.fail_create.store(true, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self) {
        self.fail_delete.store(true, Ordering::SeqCst);
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn deleted_ids(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn total_calls(&self) -> usize {
        self.create_calls() + self.delete_calls()
    }
}

#[async_trait]
impl ImageStorage for FakeImageService {
    async fn create_image(
        &self,
        _data: &str,
        _content_type: &str,
    ) -> ImageServiceResult<RemoteImage> {
        let n = self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(ImageServiceError::UnexpectedStatus {
                status: 503,
                expected: 201,
            });
        }

        let queued = self.queued.lock().unwrap().pop_front();
        Ok(queued.unwrap_or_else(|| RemoteImage {
            id: format!("img-{}", n),
            image_url: format!("https://store.example.com/img-{}", n),
        }))
    }

    async fn delete_image(&self, id: &str) -> ImageServiceResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(ImageServiceError::UnexpectedStatus {
                status: 500,
                expected: 204,
            });
        }
        self.deleted.lock().unwrap().push(id.to_string());
        Ok(())
    }
}

/// In-memory metadata store that counts calls and can fail removals on demand
#[derive(Default)]
pub struct CountingStore {
    inner: InMemoryImageRepository,
    calls: AtomicUsize,
    lookups: AtomicUsize,
    fail_remove: AtomicBool,
}

impl CountingStore {
    pub fn fail_removes(&self) {
        self.fail_remove.store(true, Ordering::SeqCst);
    }

    /// Calls of any kind
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `get_by_id` calls only
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.inner.len().await
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ImageRepository for CountingStore {
    async fn get_all(&self) -> Result<Vec<ImageRecord>, AppError> {
        self.record_call();
        self.inner.get_all().await
    }

    async fn get_by_id(&self, img_id: &str) -> Result<Option<ImageRecord>, AppError> {
        self.record_call();
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.get_by_id(img_id).await
    }

    async fn add(&self, image: NewImage) -> Result<ImageRecord, AppError> {
        self.record_call();
        self.inner.add(image).await
    }

    async fn update(
        &self,
        record: &ImageRecord,
        changes: &ImageUpdate,
    ) -> Result<ImageRecord, AppError> {
        self.record_call();
        self.inner.update(record, changes).await
    }

    async fn remove(&self, record: &ImageRecord) -> Result<(), AppError> {
        self.record_call();
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(AppError::Internal("injected store failure".to_string()));
        }
        self.inner.remove(record).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.inner.ping().await
    }
}
