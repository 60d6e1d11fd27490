//! Entity registry and per-tick contact bookkeeping.

use crate::{
    body::{Collidable, Handle, Peer},
    broad::{scan, WorldBody},
    config::Config,
    contact::{Contact, ContactSet},
    error::{Error, Result},
    narrow::{globalize, Collider},
    EntityId, Fp,
};
use fnv::{FnvBuildHasher, FnvHashMap};
use indexmap::IndexMap;
use std::{fmt, rc::Rc};

enum Command {
    Register(Handle),
    Unregister(EntityId),
}

/// Registry changes requested from inside notification hooks.
///
/// Nothing in the queue takes effect until the current pass has delivered every
/// notification; the next call to `detect` sees the result.
#[derive(Default)]
pub struct Commands {
    queue: Vec<Command>,
}
impl Commands {
    pub fn register(&mut self, entity: Handle) {
        self.queue.push(Command::Register(entity));
    }
    pub fn unregister(&mut self, id: EntityId) {
        self.queue.push(Command::Unregister(id));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
impl fmt::Debug for Commands {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Commands").field("len", &self.queue.len()).finish()
    }
}

/// Summary of one [`CollisionManager::detect`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Report {
    pub pairs_tested: usize,
    pub pairs_touching: usize,
    pub swept_hits: usize,
    pub entered: usize,
    pub exited: usize,
    /// Queued registry changes that took effect.
    pub commands_applied: usize,
    /// Queued registrations that were refused.
    pub commands_failed: usize,
}

#[inline]
fn address(handle: &Handle) -> usize {
    Rc::as_ptr(handle) as *const () as usize
}

fn notify(
    this: (EntityId, &Handle),
    other: (EntityId, &Handle),
    hook: impl FnOnce(&mut (dyn Collidable + 'static), Peer<'_>),
) -> Result<()> {
    let mut entity = this.1.try_borrow_mut().map_err(|_| Error::Busy(this.0))?;
    let peer = other.1.try_borrow().map_err(|_| Error::Busy(other.0))?;
    hook(&mut *entity, Peer { id: other.0, entity: &*peer });
    Ok(())
}

fn keep_first(failure: &mut Option<Error>, result: Result<()>) {
    if let Err(err) = result {
        log::warn!("notification skipped: {}", err);
        failure.get_or_insert(err);
    }
}

/// Owns the collidable entities of one simulation and the contacts between them.
///
/// Two generations of contacts are kept: the set committed by the last `detect` and the
/// set being built by the current one. Diffing them yields enter and exit notifications.
pub struct CollisionManager {
    config: Config,
    /// Registered entities, in registration order.
    entities: IndexMap<EntityId, Handle, FnvBuildHasher>,
    /// Handle address to id, for idempotent registration.
    addresses: FnvHashMap<usize, EntityId>,
    previous: ContactSet,
    current: ContactSet,
    next_id: u64,
}

impl Default for CollisionManager {
    fn default() -> Self {
        CollisionManager::new()
    }
}

impl fmt::Debug for CollisionManager {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("CollisionManager")
            .field("config", &self.config)
            .field("entities", &self.entities.keys().collect::<Vec<_>>())
            .field("contacts", &self.previous)
            .finish()
    }
}

impl CollisionManager {
    pub fn new() -> CollisionManager {
        CollisionManager::with_config(Config::default())
    }
    pub fn with_config(config: Config) -> CollisionManager {
        CollisionManager {
            config,
            entities: IndexMap::default(),
            addresses: FnvHashMap::default(),
            previous: ContactSet::default(),
            current: ContactSet::default(),
            next_id: 0,
        }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    // ---------- Registry ---------- //

    pub fn register(&mut self, entity: Handle) -> Result<EntityId> {
        //! Adds `entity` to the scan, returning its id.
        //!
        //! Registering a handle that is already registered returns the existing id. The
        //! entity's geometry is validated first; an invalid entity is not registered.
        let addr = address(&entity);
        if let Some(&id) = self.addresses.get(&addr) {
            return Ok(id);
        }

        let id = EntityId(self.next_id);
        {
            let borrowed = entity.try_borrow().map_err(|_| Error::Busy(id))?;
            WorldBody::capture(id, &*borrowed)?;
        }
        self.next_id += 1;
        self.entities.insert(id, entity);
        self.addresses.insert(addr, id);
        log::debug!("registered entity {}", id);
        Ok(id)
    }

    pub fn unregister(&mut self, id: EntityId) -> bool {
        //! Removes the entity and every contact involving it, from both generations.
        //! Returns whether it was registered.
        let handle = match self.entities.shift_remove(&id) {
            Some(handle) => handle,
            None => return false,
        };
        self.addresses.remove(&address(&handle));
        self.previous.retain(|c| !c.involves(id));
        self.current.retain(|c| !c.involves(id));
        log::debug!("unregistered entity {}", id);
        true
    }

    pub fn clear(&mut self) {
        //! Drops every entity and contact. Ids are not reused afterwards.
        self.entities.clear();
        self.addresses.clear();
        self.previous.clear();
        self.current.clear();
        log::debug!("cleared collision manager");
    }

    pub fn apply(&mut self, commands: Commands) -> Result<()> {
        //! Carries out queued registry changes in order.
        //!
        //! Every command is attempted; the first failed registration is returned.
        let (_, failures) = self.apply_counted(commands);
        failures.into_iter().next().map_or(Ok(()), Err)
    }

    fn apply_counted(&mut self, commands: Commands) -> (usize, Vec<Error>) {
        //! Returns how many commands changed the registry, and the refused registrations.
        let mut applied = 0;
        let mut failures = Vec::new();
        for command in commands.queue {
            match command {
                Command::Register(entity) => {
                    if self.id_of(&entity).is_some() {
                        continue;
                    }
                    match self.register(entity) {
                        Ok(id) => {
                            log::debug!("deferred registration of {} applied", id);
                            applied += 1;
                        }
                        Err(err) => {
                            log::warn!("deferred registration failed: {}", err);
                            failures.push(err);
                        }
                    }
                }
                Command::Unregister(id) => {
                    if self.unregister(id) {
                        applied += 1;
                    }
                }
            }
        }
        (applied, failures)
    }

    // ---------- Queries ---------- //

    #[inline]
    pub fn len(&self) -> usize {
        self.entities.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
    #[inline]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }
    pub fn id_of(&self, entity: &Handle) -> Option<EntityId> {
        self.addresses.get(&address(entity)).copied()
    }
    pub fn get(&self, id: EntityId) -> Option<&Handle> {
        self.entities.get(&id)
    }
    /// Registered ids, in registration order.
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys().copied()
    }

    /// Contacts committed by the last `detect`, in discovery order.
    pub fn contacts(&self) -> impl Iterator<Item = &Contact> + '_ {
        self.previous.iter()
    }
    pub fn is_touching(&self, a: EntityId, b: EntityId) -> bool {
        self.previous.iter().any(|c| c.involves(a) && c.involves(b) && a != b)
    }

    pub fn world_colliders(&self, id: EntityId) -> Result<Vec<Collider>> {
        //! Returns the entity's colliders in world space, e.g. for drawing hitboxes.
        let handle = self.entities.get(&id).ok_or(Error::UnknownEntity(id))?;
        let entity = handle.try_borrow().map_err(|_| Error::Busy(id))?;
        Ok(entity.colliders().iter().map(|c| globalize(c, &*entity)).collect())
    }

    // ---------- Detection ---------- //

    pub fn detect(&mut self, delta: Fp) -> Result<Report> {
        //! Runs one tick of detection and delivers its notifications.
        //!
        //! 1. Every registered entity's colliders are captured in world space. A contract
        //!    violation aborts the pass here, leaving the contact sets untouched.
        //! 2. Every pair is tested and the tick's contacts collected.
        //! 3. The new contacts are committed as the previous generation.
        //! 4. `during_collision` goes to both entities of every touching pair, then `on_enter`
        //!    for contacts new this tick, then `on_exit` for contacts that ended.
        //! 5. Registry changes queued by the hooks are applied.
        //!
        //! Every entity must be free to borrow mutably when the pass starts, otherwise it
        //! aborts with `Busy` before step 1 completes. Refused deferred registrations are
        //! logged and counted in the report, not returned as errors.
        let snapshot: Vec<(EntityId, Handle)> = self.entities.iter().map(|(&id, h)| (id, h.clone())).collect();

        let mut bodies = Vec::with_capacity(snapshot.len());
        for (id, handle) in snapshot.iter() {
            let captured = handle
                .try_borrow_mut()
                .map_err(|_| Error::Busy(*id))
                .and_then(|entity| WorldBody::capture(*id, &*entity));
            match captured {
                Ok(body) => bodies.push(body),
                Err(err) => {
                    log::warn!("detection aborted: {}", err);
                    return Err(err);
                }
            }
        }

        self.current.clear();
        let stats = scan(&bodies, delta, &self.config, &mut self.current);

        let entered: Vec<Contact> = self.current.difference(&self.previous).cloned().collect();
        let exited: Vec<Contact> = self.previous.difference(&self.current).cloned().collect();
        std::mem::swap(&mut self.previous, &mut self.current);
        self.current.clear();

        let mut commands = Commands::default();
        let notified = self.notify_all(&snapshot, &stats.touching, &entered, &exited, delta, &mut commands);

        let (applied, failures) = self.apply_counted(commands);
        let report = Report {
            pairs_tested: stats.pairs_tested,
            pairs_touching: stats.touching.len(),
            swept_hits: stats.swept_hits,
            entered: entered.len(),
            exited: exited.len(),
            commands_applied: applied,
            commands_failed: failures.len(),
        };
        notified.map(|_| report)
    }

    fn notify_all(
        &self,
        snapshot: &[(EntityId, Handle)],
        touching: &[(usize, usize)],
        entered: &[Contact],
        exited: &[Contact],
        delta: Fp,
        commands: &mut Commands,
    ) -> Result<()> {
        //! Delivers every notification it can, returning the first one that could not be.
        let mut failure = None;
        for &(i, j) in touching {
            let (a, b) = (&snapshot[i], &snapshot[j]);
            let sent = notify((a.0, &a.1), (b.0, &b.1), |e, peer| e.during_collision(peer, delta, commands));
            keep_first(&mut failure, sent);
            let sent = notify((b.0, &b.1), (a.0, &a.1), |e, peer| e.during_collision(peer, delta, commands));
            keep_first(&mut failure, sent);
        }

        for contact in entered {
            log::trace!("contact enter {:?} {:?}", contact.first(), contact.second());
            let sent = self.notify_contact(contact, commands, |e, peer, tag, commands| e.on_enter(peer, tag, commands));
            keep_first(&mut failure, sent);
        }
        for contact in exited {
            log::trace!("contact exit {:?} {:?}", contact.first(), contact.second());
            let sent = self.notify_contact(contact, commands, |e, peer, tag, commands| e.on_exit(peer, tag, commands));
            keep_first(&mut failure, sent);
        }
        failure.map_or(Ok(()), Err)
    }

    fn notify_contact(
        &self,
        contact: &Contact,
        commands: &mut Commands,
        hook: impl Fn(&mut (dyn Collidable + 'static), Peer<'_>, &str, &mut Commands),
    ) -> Result<()> {
        //! Delivers `hook` to both sides of `contact`, each told the other side's tag.
        let (a, tag_a) = contact.first();
        let (b, tag_b) = contact.second();
        // contacts only ever reference registered entities; unregistering purges them
        let (ha, hb) = match (self.entities.get(&a), self.entities.get(&b)) {
            (Some(ha), Some(hb)) => (ha, hb),
            _ => return Ok(()),
        };
        let first = notify((a, ha), (b, hb), |e, peer| hook(e, peer, tag_b, commands));
        let second = notify((b, hb), (a, ha), |e, peer| hook(e, peer, tag_a, commands));
        first.and(second)
    }
}
