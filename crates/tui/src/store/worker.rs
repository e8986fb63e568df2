use anyhow::Result;
use catalog_client::{Client, Session};
use log::debug;
use std::{
    panic,
    sync::mpsc::{channel, Receiver, Sender},
    thread,
};

use super::{Event, Mutation, PageData, PageReq, Request};
use crate::event::{Event as CrateEvent, EventBus};

/// Performs requests it receives from the main thread, and sends the results back.
pub struct Worker {
    client: Client,
    msg_recv: Receiver<Request>,
    event_send: Sender<CrateEvent>,
}

impl Worker {
    /// Spawn the store worker on the given event bus, returning a channel to send commands down.
    pub(crate) fn spawn_on(bus: &EventBus, client: Client) -> Result<Sender<Request>> {
        let (cmd_send, cmd_recv) = channel();

        bus.spawn("store_worker", move |_, event_send| {
            // we don't need running because the receiver will raise an error and we'll exit
            Worker {
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
            let event = self.process_msg(msg);
            if let Err(e) = self.event_send.send(CrateEvent::Store(event)) {
                debug!("error sending event: {:?}", e);
                break;
            }
        }

        debug!("shutting down");
    }

    fn process_msg(&self, msg: Request) -> Event {
        match msg {
            Request::Load { epoch, page } => Event::Loaded {
                epoch,
                result: self.load_page(page),
            },
            Request::Mutate { session, mutation } => Event::Mutated {
                kind: mutation.kind(),
                result: self.mutate(&session, mutation),
            },
            Request::Login(creds) => Event::LoggedIn(self.client.login(&creds)),
        }
    }

    fn load_page(&self, page: PageReq) -> catalog_client::Result<PageData> {
        let client = &self.client;
        Ok(match page {
            PageReq::Colleges => PageData::Colleges(client.colleges()?),
            PageReq::College(id) => {
                let (college, courses) =
                    join(|| client.college(&id), || client.courses_for_college(&id))?;
                PageData::College { college, courses }
            }
            PageReq::Course(id) => {
                let (course, materials) = join(|| client.course(&id), || client.materials(&id))?;
                PageData::Course { course, materials }
            }
            PageReq::Admin(session) => {
                let admin = client.admin(&session);
                let (colleges, courses) = join(|| admin.colleges(), || admin.courses())?;
                PageData::Admin { colleges, courses }
            }
        })
    }

    fn mutate(&self, session: &Session, mutation: Mutation) -> catalog_client::Result<()> {
        let admin = self.client.admin(session);
        match mutation {
            Mutation::CreateCollege(c) => admin.create_college(&c).map(drop),
            Mutation::DeleteCollege(id) => admin.delete_college(&id),
            Mutation::CreateCourse(c) => admin.create_course(&c).map(drop),
            Mutation::DeleteCourse(id) => admin.delete_course(&id),
            Mutation::UploadMaterial(m) => admin.upload_material(&m).map(drop),
        }
    }
}

/// Run both requests at once, waiting for both to finish before returning either.
fn join<A, B, FA, FB>(a: FA, b: FB) -> catalog_client::Result<(A, B)>
where
    A: Send,
    FA: FnOnce() -> catalog_client::Result<A> + Send,
    FB: FnOnce() -> catalog_client::Result<B>,
{
    thread::scope(|s| {
        let a = s.spawn(a);
        let b = b();
        let a = a.join().unwrap_or_else(|e| panic::resume_unwind(e));
        Ok((a?, b?))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        sync::atomic::{AtomicBool, Ordering},
        time::Duration,
    };

    #[test]
    fn join_waits_for_both() {
        let slow_done = AtomicBool::new(false);
        let res = join(
            || {
                thread::sleep(Duration::from_millis(50));
                slow_done.store(true, Ordering::SeqCst);
                Ok(1)
            },
            || Ok("fast"),
        );
        assert!(slow_done.load(Ordering::SeqCst));
        assert_eq!(res.unwrap(), (1, "fast"));
    }

    #[test]
    fn join_fails_if_either_fails() {
        let res: catalog_client::Result<(u8, u8)> =
            join(|| Ok(1), || Err(catalog_client::Error::LoginFailed));
        assert!(res.is_err());

        let res: catalog_client::Result<(u8, u8)> =
            join(|| Err(catalog_client::Error::LoginFailed), || Ok(1));
        assert!(res.is_err());
    }
}
