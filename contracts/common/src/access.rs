use soroban_sdk::{contracttype, Address, Env};

// ── Storage Keys ─────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
enum AccessKey {
    Owner,
    Tier(Address),
}

const TTL_THRESHOLD: u32 = 5_184_000;
const TTL_EXTEND_TO: u32 = 10_368_000;

// ── Tiers ────────────────────────────────────────────────────────────────────

/// Privilege tiers understood by [`AccessPolicy`].
///
/// - `Manager` – may change contract configuration and manage the reward
///               token whitelist.
/// - `Owner`   – everything a `Manager` can do, plus granting and revoking
///               tiers for other addresses.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum AccessTier {
    Manager = 1,
    Owner = 2,
}

impl AccessTier {
    pub fn rank(&self) -> u32 {
        match self {
            AccessTier::Manager => 1,
            AccessTier::Owner => 2,
        }
    }

    /// Returns true if this tier is at least as high as `min_tier`.
    pub fn satisfies(&self, min_tier: AccessTier) -> bool {
        self.rank() >= min_tier.rank()
    }
}

// ── Policy ───────────────────────────────────────────────────────────────────

/// Capability object guarding every privileged entry point of a contract.
///
/// Contracts never compare caller addresses against a stored admin directly;
/// they ask the policy whether `caller` holds a tier. The policy does not call
/// `require_auth` itself, callers authenticate first.
pub struct AccessPolicy<'a> {
    env: &'a Env,
}

impl<'a> AccessPolicy<'a> {
    pub fn new(env: &'a Env) -> Self {
        Self { env }
    }

    /// Installs `owner` as the first `Owner`. Only meaningful during
    /// contract initialisation.
    pub fn bootstrap(&self, owner: &Address) {
        self.env.storage().instance().set(&AccessKey::Owner, owner);
        self.write_tier(owner, AccessTier::Owner);
    }

    /// The address that bootstrapped the policy.
    pub fn owner(&self) -> Option<Address> {
        self.env.storage().instance().get(&AccessKey::Owner)
    }

    pub fn tier_of(&self, who: &Address) -> Option<AccessTier> {
        let key = AccessKey::Tier(who.clone());
        let tier: Option<AccessTier> = self.env.storage().persistent().get(&key);
        if tier.is_some() {
            self.env
                .storage()
                .persistent()
                .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
        }
        tier
    }

    /// Returns `true` when `who` holds `min_tier` or higher.
    pub fn allows(&self, who: &Address, min_tier: AccessTier) -> bool {
        self.tier_of(who)
            .map(|tier| tier.satisfies(min_tier))
            .unwrap_or(false)
    }

    /// Assigns `tier` to `target`. Returns `false` if `caller` is not an `Owner`.
    pub fn grant(&self, caller: &Address, target: &Address, tier: AccessTier) -> bool {
        if !self.allows(caller, AccessTier::Owner) {
            return false;
        }
        self.write_tier(target, tier);
        true
    }

    /// Removes any tier held by `target`. Returns `false` if `caller` is not an
    /// `Owner`, or if `target` is the bootstrapped owner (the policy must
    /// always keep one owner).
    pub fn revoke(&self, caller: &Address, target: &Address) -> bool {
        if !self.allows(caller, AccessTier::Owner) {
            return false;
        }
        if self.owner().as_ref() == Some(target) {
            return false;
        }
        self.env
            .storage()
            .persistent()
            .remove(&AccessKey::Tier(target.clone()));
        true
    }

    fn write_tier(&self, who: &Address, tier: AccessTier) {
        let key = AccessKey::Tier(who.clone());
        self.env.storage().persistent().set(&key, &tier);
        self.env
            .storage()
            .persistent()
            .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
}
