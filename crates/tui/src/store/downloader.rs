use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use catalog_client::Client;
use log::{debug, warn};
use std::{
    fs::{self, File},
    io::{self, Write},
    sync::mpsc::{channel, Receiver, Sender},
};

use super::Event;
use crate::event::{Event as CrateEvent, EventBus};

#[derive(Debug, Clone)]
pub struct DownloadReq {
    pub url: String,
    pub dest: Utf8PathBuf,
}

#[derive(Debug, Clone)]
pub enum DownloadState {
    Queued,
    InProgress(f32),
    Completed,
    Errored(String),
}

/// Requests sent to the downloader thread
#[derive(Debug)]
pub enum DownloaderRequest {
    /// Download the material with the given ID
    DoDownload(String, DownloadReq),
}

/// Performs downloads it receives from the main thread, reporting progress back.
pub struct Downloader {
    client: Client,
    msg_recv: Receiver<DownloaderRequest>,
    event_send: Sender<CrateEvent>,
}

impl Downloader {
    /// Spawn the downloader on the given event bus, returning a channel to send commands down.
    pub(crate) fn spawn_on(bus: &EventBus, client: Client) -> Result<Sender<DownloaderRequest>> {
        let (cmd_send, cmd_recv) = channel();

        bus.spawn("downloader", move |_, event_send| {
            Downloader {
                client,
                msg_recv: cmd_recv,
                event_send,
            }
            .main()
        })?;

        Ok(cmd_send)
    }

    fn main(self) {
        while let Ok(msg) = self.msg_recv.recv() {
            debug!("received message: {:?}", msg);
            let DownloaderRequest::DoDownload(id, req) = msg;

            let state = match self.do_download(&id, &req) {
                Ok(()) => DownloadState::Completed,
                Err(e) => DownloadState::Errored(format!("{:#}", e)),
            };
            if let Err(e) = self.send_state(&id, state) {
                debug!("error sending event: {:?}", e);
                break;
            }
        }

        debug!("shutting down");
    }

    fn send_state(
        &self,
        id: &str,
        state: DownloadState,
    ) -> Result<(), std::sync::mpsc::SendError<CrateEvent>> {
        self.event_send
            .send(CrateEvent::Store(Event::DownloadState(id.to_string(), state)))
    }

    fn do_download(&self, id: &str, req: &DownloadReq) -> Result<()> {
        debug!("downloading {req:?} (material = {id})");
        if let Some(parent) = req.dest.parent() {
            fs::create_dir_all(parent).context("error creating download directory")?;
        }

        let mut resp = self.client.download(&req.url)?;
        let size = resp.content_length();

        save_via_part(&req.dest, |f| {
            let mut writer = ProgressWriter {
                dest: f,
                on_progress: |pct: f32| {
                    // the main loop only stops listening when we're shutting down anyway
                    let _ = self.send_state(id, DownloadState::InProgress(pct));
                },
                size,
                downloaded: 0,
                last_sent: 0.0,
            };
            resp.copy_to(&mut writer)
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            Ok(())
        })
    }
}

/// Write a file next to `dest`, only moving it into place once it's complete.
/// The partial file is always removed if writing fails.
pub(crate) fn save_via_part<F>(dest: &Utf8Path, write: F) -> Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let part = Utf8PathBuf::from(format!("{}.part", dest));
    let res = File::create(&part)
        .and_then(|mut f| write(&mut f).and_then(|_| f.flush()))
        .and_then(|_| fs::rename(&part, dest));

    if let Err(e) = res {
        if let Err(rm) = fs::remove_file(&part) {
            if rm.kind() != io::ErrorKind::NotFound {
                warn!("error removing {}: {}", part, rm);
            }
        }
        return Err::<(), _>(e).with_context(|| format!("error saving {}", dest));
    }

    Ok(())
}

/// Passes writes through, reporting how far through we are every percent.
struct ProgressWriter<'a, F> {
    dest: &'a mut File,
    on_progress: F,
    size: Option<u64>,
    downloaded: u64,
    last_sent: f32,
}

impl<'a, F: FnMut(f32)> Write for ProgressWriter<'a, F> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.dest.write(buf)?;
        self.downloaded += n as u64;

        // without a content-length there's nothing to report against
        if let Some(size) = self.size.filter(|s| *s > 0) {
            let pct = self.downloaded as f32 / size as f32;
            if pct - self.last_sent > 0.01 {
                (self.on_progress)(pct);
                self.last_sent = pct;
            }
        }

        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.dest.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_to_string(path: &Utf8Path) -> String {
        fs::read_to_string(path).unwrap()
    }

    fn temp_dir() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        (dir, path)
    }

    #[test]
    fn completed_download_is_moved_into_place() {
        let (_dir, path) = temp_dir();
        let dest = path.join("Intro Data Structures.pdf");

        save_via_part(&dest, |f| f.write_all(b"%PDF-1.4")).unwrap();

        assert_eq!(read_to_string(&dest), "%PDF-1.4");
        assert!(!path.join("Intro Data Structures.pdf.part").exists());
    }

    #[test]
    fn failed_download_leaves_nothing_behind() {
        let (_dir, path) = temp_dir();
        let dest = path.join("notes.pdf");

        let res = save_via_part(&dest, |f| {
            f.write_all(b"half a fi")?;
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
        });

        assert!(res.is_err());
        assert!(!dest.exists());
        assert!(!path.join("notes.pdf.part").exists());
    }

    #[test]
    fn progress_is_reported_in_steps() {
        let (_dir, path) = temp_dir();
        let mut f = File::create(path.join("x")).unwrap();
        let mut seen = vec![];
        {
            let mut w = ProgressWriter {
                dest: &mut f,
                on_progress: |p: f32| seen.push(p),
                size: Some(100),
                downloaded: 0,
                last_sent: 0.0,
            };
            for _ in 0..4 {
                w.write_all(&[0; 25]).unwrap();
            }
        }
        assert_eq!(seen, vec![0.25, 0.5, 0.75, 1.0]);
    }
}
