use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use catalog_client::{
    college::{College, NewCollege},
    course::{Course, NewCourse},
    download::download_filename,
    material::{Material, NewMaterial},
    Client, Credentials, Session,
};
use log::{debug, error, warn};
use std::{collections::HashMap, sync::mpsc::Sender};

mod downloader;
mod worker;

pub use downloader::{DownloadReq, DownloadState};
use downloader::{Downloader, DownloaderRequest};
use worker::Worker;

use crate::{event::EventBus, route::Route, views::Action};

/// Increases every time the user navigates. Results for an older epoch are thrown away.
pub type Epoch = u64;

/// Holds whatever the current page has fetched, and talks to the background threads.
pub struct Store {
    epoch: Epoch,
    load: Load,

    /// The last page load requested, so it can be retried
    last_load: Option<PageReq>,

    /// Set while a create/delete/upload/login is waiting on the backend
    in_flight: bool,

    downloads: HashMap<String, (DownloadReq, DownloadState)>,
    download_dir: Utf8PathBuf,

    worker_channel: Sender<Request>,
    downloader_channel: Sender<DownloaderRequest>,
}

/// Loading status of the current page's data
#[derive(Debug)]
pub enum Load {
    /// The page has nothing to fetch
    Idle,
    Loading,
    Failed,
    Done(PageData),
}

/// Data fetched for a page. Pages with a scope (eg a college) get it alongside its children.
#[derive(Debug)]
pub enum PageData {
    Colleges(Vec<College>),
    College {
        college: College,
        courses: Vec<Course>,
    },
    Course {
        course: Course,
        materials: Vec<Material>,
    },
    Admin {
        colleges: Vec<College>,
        courses: Vec<Course>,
    },
}

/// Which page to load
#[derive(Debug, Clone)]
pub enum PageReq {
    Colleges,
    College(String),
    Course(String),
    Admin(Session),
}

/// A change to the catalog requested by an admin
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    CreateCollege(NewCollege),
    DeleteCollege(String),
    CreateCourse(NewCourse),
    DeleteCourse(String),
    UploadMaterial(NewMaterial),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    CreateCollege,
    DeleteCollege,
    CreateCourse,
    DeleteCourse,
    UploadMaterial,
}

/// Requests sent to the worker thread
#[derive(Debug)]
pub enum Request {
    Load { epoch: Epoch, page: PageReq },
    Mutate { session: Session, mutation: Mutation },
    Login(Credentials),
}

/// Messages received by the app from the background threads
#[derive(Debug)]
pub enum Event {
    Loaded {
        epoch: Epoch,
        result: Result<PageData, catalog_client::Error>,
    },
    Mutated {
        kind: MutationKind,
        result: Result<(), catalog_client::Error>,
    },
    LoggedIn(Result<Session, catalog_client::Error>),
    DownloadState(String, DownloadState),
}

impl Mutation {
    pub fn kind(&self) -> MutationKind {
        match self {
            Mutation::CreateCollege(_) => MutationKind::CreateCollege,
            Mutation::DeleteCollege(_) => MutationKind::DeleteCollege,
            Mutation::CreateCourse(_) => MutationKind::CreateCourse,
            Mutation::DeleteCourse(_) => MutationKind::DeleteCourse,
            Mutation::UploadMaterial(_) => MutationKind::UploadMaterial,
        }
    }
}

impl MutationKind {
    /// How a failure is reported, eg `Error adding college`
    pub fn failure_prefix(&self) -> &'static str {
        match self {
            MutationKind::CreateCollege => "Error adding college",
            MutationKind::DeleteCollege => "Error deleting college",
            MutationKind::CreateCourse => "Error adding course",
            MutationKind::DeleteCourse => "Error deleting course",
            MutationKind::UploadMaterial => "Error uploading material",
        }
    }

    /// What to tell the user on success, if anything
    pub fn success_message(&self) -> Option<&'static str> {
        match self {
            MutationKind::CreateCollege => Some("College added successfully!"),
            MutationKind::CreateCourse => Some("Course added successfully!"),
            MutationKind::UploadMaterial => Some("Material uploaded successfully!"),
            MutationKind::DeleteCollege | MutationKind::DeleteCourse => None,
        }
    }

    /// Whether the admin lists need fetching again afterwards
    pub fn changes_listing(&self) -> bool {
        !matches!(self, MutationKind::UploadMaterial)
    }
}

impl Store {
    /// Create a store, spawning its worker and downloader on the given bus.
    pub fn new(bus: &EventBus, client: Client, download_dir: Utf8PathBuf) -> anyhow::Result<Self> {
        let worker_channel = Worker::spawn_on(bus, client.clone())?;
        let downloader_channel = Downloader::spawn_on(bus, client)?;

        Ok(Self::with_channels(
            worker_channel,
            downloader_channel,
            download_dir,
        ))
    }

    fn with_channels(
        worker_channel: Sender<Request>,
        downloader_channel: Sender<DownloaderRequest>,
        download_dir: Utf8PathBuf,
    ) -> Self {
        Self {
            epoch: 0,
            load: Load::Idle,
            last_load: None,
            in_flight: false,
            downloads: Default::default(),
            download_dir,
            worker_channel,
            downloader_channel,
        }
    }

    /// Start a new navigation epoch for the given route, fetching whatever it shows.
    pub fn enter(&mut self, route: &Route, session: Option<&Session>) {
        let page = match (route, session) {
            (Route::Dashboard, _) => Some(PageReq::Colleges),
            (Route::Courses(id), _) => Some(PageReq::College(id.clone())),
            (Route::Materials(id), _) => Some(PageReq::Course(id.clone())),
            (Route::Admin, Some(s)) => Some(PageReq::Admin(s.clone())),
            (Route::Admin, None) => {
                warn!("entered admin panel without a session");
                None
            }
            (Route::Home | Route::AdminLogin, _) => None,
        };

        self.epoch += 1;
        self.last_load = page;
        self.load = Load::Loading;
        self.send_load();
    }

    /// Load the current page again.
    /// Whatever was already fetched stays on screen until the new data arrives.
    pub fn refresh(&mut self) {
        self.epoch += 1;
        if !matches!(self.load, Load::Done(_)) {
            self.load = Load::Loading;
        }
        self.send_load();
    }

    fn send_load(&mut self) {
        let Some(page) = self.last_load.clone() else {
            self.load = Load::Idle;
            return;
        };

        debug!("loading {:?} (epoch {})", page, self.epoch);
        let req = Request::Load {
            epoch: self.epoch,
            page,
        };
        if let Err(e) = self.worker_channel.send(req) {
            error!("store worker has gone away: {}", e);
            self.load = Load::Failed;
        }
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn load(&self) -> &Load {
        &self.load
    }

    pub fn load_failed(&self) -> bool {
        matches!(self.load, Load::Failed)
    }

    pub fn colleges(&self) -> Option<&[College]> {
        match &self.load {
            Load::Done(PageData::Colleges(cs)) => Some(cs),
            _ => None,
        }
    }

    pub fn college_page(&self) -> Option<(&College, &[Course])> {
        match &self.load {
            Load::Done(PageData::College { college, courses }) => Some((college, courses)),
            _ => None,
        }
    }

    pub fn course_page(&self) -> Option<(&Course, &[Material])> {
        match &self.load {
            Load::Done(PageData::Course { course, materials }) => Some((course, materials)),
            _ => None,
        }
    }

    pub fn admin_page(&self) -> Option<(&[College], &[Course])> {
        match &self.load {
            Load::Done(PageData::Admin { colleges, courses }) => Some((colleges, courses)),
            _ => None,
        }
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Send a mutation to the backend. Returns false, doing nothing, if another is still in flight.
    pub fn submit(&mut self, session: &Session, mutation: Mutation) -> bool {
        if self.in_flight {
            debug!("ignoring {:?}, another request is in flight", mutation.kind());
            return false;
        }

        self.send_in_flight(Request::Mutate {
            session: session.clone(),
            mutation,
        })
    }

    /// Try to log in. Shares the in-flight flag with mutations.
    pub fn login(&mut self, creds: Credentials) -> bool {
        if self.in_flight {
            return false;
        }

        self.send_in_flight(Request::Login(creds))
    }

    fn send_in_flight(&mut self, req: Request) -> bool {
        match self.worker_channel.send(req) {
            Ok(()) => {
                self.in_flight = true;
                true
            }
            Err(e) => {
                error!("store worker has gone away: {}", e);
                false
            }
        }
    }

    /// Queue a material for download into the download directory
    pub fn download(&mut self, material: &Material) {
        let name = download_filename(&material.title, &material.file_type);
        let req = DownloadReq {
            url: material.file_url.clone(),
            dest: self.download_dir.join(&name),
        };

        if !stays_inside(&self.download_dir, &name) {
            error!("refusing to download {} to {:?}", material.id, req.dest);
            let state = DownloadState::Errored(format!("unsafe file name {:?}", name));
            self.downloads.insert(material.id.clone(), (req, state));
            return;
        }

        let msg = DownloaderRequest::DoDownload(material.id.clone(), req.clone());
        if let Err(e) = self.downloader_channel.send(msg) {
            error!("downloader has gone away: {}", e);
            return;
        }
        self.downloads
            .insert(material.id.clone(), (req, DownloadState::Queued));
    }

    pub fn download_status(&self, material_id: &str) -> Option<&(DownloadReq, DownloadState)> {
        self.downloads.get(material_id)
    }

    pub fn event(&mut self, e: Event) -> Action {
        match e {
            Event::Loaded { epoch, .. } if epoch != self.epoch => {
                debug!("discarding stale load (epoch {} != {})", epoch, self.epoch);
            }
            Event::Loaded {
                result: Ok(data), ..
            } => self.load = Load::Done(data),
            Event::Loaded { result: Err(e), .. } => {
                error!("error fetching data: {}", e);
                self.load = Load::Failed;
            }

            Event::Mutated { kind, result } => {
                self.in_flight = false;
                return Action::MutationFinished(kind, result.map_err(|e| e.to_string()));
            }

            Event::LoggedIn(result) => {
                self.in_flight = false;
                return match result {
                    Ok(session) => Action::LoggedIn(session),
                    Err(e) => {
                        debug!("login failed: {}", e);
                        Action::Notify("Invalid username or password".to_string())
                    }
                };
            }

            Event::DownloadState(id, state) => {
                if let DownloadState::Errored(e) = &state {
                    error!("error downloading {}: {}", id, e);
                }
                if let Some((_, s)) = self.downloads.get_mut(&id) {
                    *s = state;
                }
            }
        };

        Action::None
    }
}

/// Whether `name` is a single plain file name, so joining it to `dir` can't leave `dir`
fn stays_inside(dir: &Utf8Path, name: &str) -> bool {
    if name.contains(['/', '\\']) || name.contains("..") {
        return false;
    }

    let mut components = Utf8Path::new(name).components();
    let single = matches!(
        (components.next(), components.next()),
        (Some(Utf8Component::Normal(n)), None) if n == name
    );
    single && dir.join(name).parent() == Some(dir)
}
