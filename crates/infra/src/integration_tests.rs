//! Service-level tests wired against the in-memory stores.
//!
//! Covers the credential lifecycle (signup, login, rotation, replay,
//! revocation) and ledger-scoped authorization across ledgers, members,
//! categories and expenses.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use chrono::NaiveDate;

    use sharebook_auth::{
        Argon2PasswordVerifier, AuthConfig, AuthService, MemberRole, MembershipStore,
        PasswordVerifier, PrincipalStore, SignupInput, TokenLifecycleManager,
    };
    use sharebook_core::{DomainResult, ErrorKind, LedgerId, UserId};
    use sharebook_ledger::{
        CategoryService, CreateCategory, CreateExpense, CreateLedger, ExpenseFilter,
        ExpenseService, LedgerGuard, LedgerService, MemberService, PageRequest, UpdateExpense,
        UpdateLedger, UserService, seed_default_categories,
    };

    use crate::store::{
        InMemoryCategoryStore, InMemoryExpenseStore, InMemoryLedgerStore, InMemoryMembershipStore,
        InMemoryPrincipalStore, InMemoryRefreshTokenStore,
    };

    type Principals = Arc<InMemoryPrincipalStore>;
    type Tokens = Arc<InMemoryRefreshTokenStore>;
    type Ledgers = Arc<InMemoryLedgerStore>;
    type Members = Arc<InMemoryMembershipStore>;
    type Categories = Arc<InMemoryCategoryStore>;
    type Expenses = Arc<InMemoryExpenseStore>;

    /// Cheap stand-in for argon2 so the ledger scenarios stay fast.
    #[derive(Debug, Clone, Copy, Default)]
    struct PlainPasswords;

    impl PasswordVerifier for PlainPasswords {
        fn hash(&self, password: &str) -> DomainResult<String> {
            Ok(format!("plain${password}"))
        }

        fn verify(&self, password: &str, hash: &str) -> DomainResult<bool> {
            Ok(hash.strip_prefix("plain$") == Some(password))
        }
    }

    fn auth_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "integration-secret-integration-secret".into(),
            access_token_ttl_secs: 3_600,
            refresh_token_ttl_secs: 604_800,
            min_password_length: 6,
        }
    }

    struct World<H> {
        principals: Principals,
        tokens: Tokens,
        memberships: Members,
        auth: AuthService<Principals, Tokens, H>,
        users: UserService<Principals, Tokens, H>,
        ledgers: LedgerService<Ledgers, Members>,
        members: MemberService<Ledgers, Members, Principals>,
        categories: CategoryService<Ledgers, Members, Categories, Expenses>,
        expenses: ExpenseService<Ledgers, Members, Categories, Expenses, Principals>,
    }

    impl<H: PasswordVerifier + Clone> World<H> {
        fn new(passwords: H) -> Self {
            let cfg = auth_config();
            let principals: Principals = Arc::new(InMemoryPrincipalStore::new());
            let tokens: Tokens = Arc::new(InMemoryRefreshTokenStore::new());
            let ledger_store: Ledgers = Arc::new(InMemoryLedgerStore::new());
            let memberships: Members = Arc::new(InMemoryMembershipStore::new());
            let category_store: Categories = Arc::new(InMemoryCategoryStore::new());
            let expense_store: Expenses = Arc::new(InMemoryExpenseStore::new());
            seed_default_categories(&category_store).unwrap();

            let lifecycle = Arc::new(TokenLifecycleManager::new(
                &cfg,
                tokens.clone(),
                principals.clone(),
            ));
            let guard = LedgerGuard::new(ledger_store, memberships.clone());

            Self {
                auth: AuthService::new(
                    principals.clone(),
                    lifecycle.clone(),
                    passwords.clone(),
                    cfg.min_password_length,
                ),
                users: UserService::new(
                    principals.clone(),
                    lifecycle,
                    passwords,
                    cfg.min_password_length,
                ),
                ledgers: LedgerService::new(guard.clone()),
                members: MemberService::new(guard.clone(), principals.clone()),
                categories: CategoryService::new(
                    guard.clone(),
                    category_store.clone(),
                    expense_store.clone(),
                ),
                expenses: ExpenseService::new(
                    guard,
                    category_store,
                    expense_store,
                    principals.clone(),
                ),
                principals,
                tokens,
                memberships,
            }
        }
    }

    fn world() -> World<PlainPasswords> {
        World::new(PlainPasswords)
    }

    fn signup<H: PasswordVerifier + Clone>(w: &World<H>, email: &str) -> UserId {
        w.auth
            .signup(SignupInput {
                email: email.into(),
                password: "secret1".into(),
                name: email.split('@').next().unwrap_or("user").into(),
            })
            .unwrap()
            .user
            .id
    }

    fn ledger<H: PasswordVerifier + Clone>(w: &World<H>, owner: UserId) -> LedgerId {
        w.ledgers
            .create(
                owner,
                CreateLedger {
                    name: "Trip".into(),
                    description: None,
                    currency: None,
                },
            )
            .unwrap()
            .id
    }

    fn expense_input(amount: &str) -> CreateExpense {
        CreateExpense {
            amount: Some(amount.into()),
            description: Some("Lunch".into()),
            expense_date: NaiveDate::from_ymd_opt(2024, 5, 1),
            payment_method: None,
            category_id: None,
        }
    }

    fn owner_count(members: &Members, ledger_id: LedgerId) -> usize {
        members
            .find_by_ledger(ledger_id)
            .unwrap()
            .into_iter()
            .filter(|m| m.role == MemberRole::Owner)
            .count()
    }

    // ─────────────────────────────────────────────────────────────
    // Credential lifecycle
    // ─────────────────────────────────────────────────────────────

    #[test]
    fn signup_then_login_with_real_hashing() {
        let w = World::new(Argon2PasswordVerifier);
        let signed_up = w
            .auth
            .signup(SignupInput {
                email: "A@X.com".into(),
                password: "secret1".into(),
                name: "Alice".into(),
            })
            .unwrap();
        assert_eq!(signed_up.user.email, "a@x.com");
        assert_eq!(signed_up.tokens.expires_in, 3_600);
        assert!(!signed_up.tokens.access_token.is_empty());

        let err = w.auth.login("a@x.com", "wrong").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(err.message(), "Invalid email or password");

        let logged_in = w.auth.login("a@x.com", "secret1").unwrap();
        assert_ne!(logged_in.tokens.refresh_token, signed_up.tokens.refresh_token);

        // The signup refresh token survives the later login.
        assert!(w.auth.refresh(&signed_up.tokens.refresh_token).is_ok());
    }

    #[test]
    fn signup_rejects_bad_input_and_duplicates() {
        let w = world();
        let err = w
            .auth
            .signup(SignupInput {
                email: "not-an-email".into(),
                password: "123".into(),
                name: String::new(),
            })
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        let fields: Vec<_> = err.field_errors().iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["email", "password", "name"]);

        signup(&w, "dup@x.com");
        let err = w
            .auth
            .signup(SignupInput {
                email: "DUP@x.com".into(),
                password: "secret1".into(),
                name: "Dup".into(),
            })
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }

    #[test]
    fn refresh_rotation_is_single_use() {
        let w = world();
        let first = w
            .auth
            .signup(SignupInput {
                email: "r@x.com".into(),
                password: "secret1".into(),
                name: "R".into(),
            })
            .unwrap();

        let second = w.auth.refresh(&first.tokens.refresh_token).unwrap();
        let replay = w.auth.refresh(&first.tokens.refresh_token).unwrap_err();
        assert_eq!(replay.kind(), ErrorKind::InvalidToken);

        // The replacement still works once.
        assert!(w.auth.refresh(&second.tokens.refresh_token).is_ok());
        assert_eq!(
            w.auth.lifecycle().authenticate(&second.tokens.access_token).unwrap(),
            first.user.id
        );
    }

    #[test]
    fn token_kinds_are_not_interchangeable() {
        let w = world();
        let out = w
            .auth
            .signup(SignupInput {
                email: "k@x.com".into(),
                password: "secret1".into(),
                name: "K".into(),
            })
            .unwrap();
        let lifecycle = w.auth.lifecycle();

        assert_eq!(
            lifecycle.authenticate(&out.tokens.refresh_token).unwrap_err().kind(),
            ErrorKind::InvalidToken
        );
        assert_eq!(
            lifecycle.rotate_refresh_token(&out.tokens.access_token).unwrap_err().kind(),
            ErrorKind::InvalidToken
        );
        assert_eq!(
            lifecycle.authenticate("garbage").unwrap_err().kind(),
            ErrorKind::InvalidToken
        );
    }

    #[test]
    fn concurrent_rotation_of_one_token_succeeds_once() {
        let w = world();
        let out = w
            .auth
            .signup(SignupInput {
                email: "race@x.com".into(),
                password: "secret1".into(),
                name: "Race".into(),
            })
            .unwrap();
        let token = out.tokens.refresh_token;
        let lifecycle = w.auth.lifecycle();

        let wins = thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| lifecycle.rotate_refresh_token(&token).is_ok()))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(|ok| *ok)
                .count()
        });
        assert_eq!(wins, 1);
    }

    #[test]
    fn logout_revokes_every_refresh_token_but_not_access_tokens() {
        let w = world();
        let first = w
            .auth
            .signup(SignupInput {
                email: "out@x.com".into(),
                password: "secret1".into(),
                name: "Out".into(),
            })
            .unwrap();
        let second = w.auth.login("out@x.com", "secret1").unwrap();

        w.auth.logout(first.user.id).unwrap();
        for t in [&first.tokens.refresh_token, &second.tokens.refresh_token] {
            assert_eq!(w.auth.refresh(t).unwrap_err().kind(), ErrorKind::InvalidToken);
        }
        // Access tokens are stateless and live until they expire.
        assert!(w.auth.lifecycle().authenticate(&second.tokens.access_token).is_ok());
        // Idempotent.
        w.auth.logout(first.user.id).unwrap();
    }

    #[test]
    fn deleted_user_cannot_login_or_refresh() {
        let w = world();
        let out = w
            .auth
            .signup(SignupInput {
                email: "gone@x.com".into(),
                password: "secret1".into(),
                name: "Gone".into(),
            })
            .unwrap();

        w.users.delete(out.user.id).unwrap();
        assert_eq!(
            w.auth.login("gone@x.com", "secret1").unwrap_err().kind(),
            ErrorKind::Unauthorized
        );
        assert_eq!(
            w.auth.refresh(&out.tokens.refresh_token).unwrap_err().kind(),
            ErrorKind::InvalidToken
        );
        assert_eq!(
            w.users.get_profile(out.user.id).unwrap_err().kind(),
            ErrorKind::NotFound
        );
        // Every token row of the user is revoked, none deleted.
        assert_eq!(w.tokens.len().unwrap(), 1);
    }

    #[test]
    fn change_password_requires_the_current_one() {
        let w = world();
        let u = signup(&w, "pw@x.com");

        let err = w.users.change_password(u, "nope-nope", "newsecret").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert_eq!(err.message(), "Current password is incorrect");

        w.users.change_password(u, "secret1", "newsecret").unwrap();
        assert!(w.auth.login("pw@x.com", "secret1").is_err());
        assert!(w.auth.login("pw@x.com", "newsecret").is_ok());
    }

    // ─────────────────────────────────────────────────────────────
    // Ledgers and membership
    // ─────────────────────────────────────────────────────────────

    #[test]
    fn creator_becomes_the_single_owner() {
        let w = world();
        let u1 = signup(&w, "a@x.com");
        let view = w
            .ledgers
            .create(
                u1,
                CreateLedger {
                    name: " Trip ".into(),
                    description: Some("Summer".into()),
                    currency: Some("usd".into()),
                },
            )
            .unwrap();
        assert_eq!(view.name, "Trip");
        assert_eq!(view.currency, "USD");
        assert_eq!(view.my_role, MemberRole::Owner);
        assert_eq!(view.member_count, 1);
        assert_eq!(owner_count(&w.memberships, view.id), 1);

        let mine = w.ledgers.list_mine(u1).unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, view.id);
    }

    #[test]
    fn role_change_scenario() {
        let w = world();
        let u1 = signup(&w, "a@x.com");
        let u2 = signup(&w, "b@x.com");
        let l = ledger(&w, u1);

        let invited = w.members.invite(u1, l, "b@x.com", MemberRole::Member).unwrap();
        assert_eq!(invited.role, MemberRole::Member);
        assert_eq!(invited.invited_by, Some(u1));
        assert_eq!(invited.user.as_ref().map(|u| u.id), Some(u2));

        let owner_row = w.memberships.find_by_user_and_ledger(u1, l).unwrap().unwrap();

        let err = w.members.update_role(u2, l, owner_row.id, MemberRole::Viewer).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        let err = w.members.update_role(u1, l, owner_row.id, MemberRole::Admin).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert_eq!(err.message(), "Cannot change OWNER's role");

        let err = w.members.update_role(u1, l, invited.id, MemberRole::Owner).unwrap_err();
        assert_eq!(err.message(), "Cannot assign OWNER role");

        let promoted = w.members.update_role(u1, l, invited.id, MemberRole::Admin).unwrap();
        assert_eq!(promoted.role, MemberRole::Admin);
        assert_eq!(owner_count(&w.memberships, l), 1);
    }

    #[test]
    fn owner_can_never_be_removed() {
        let w = world();
        let u1 = signup(&w, "a@x.com");
        let u2 = signup(&w, "b@x.com");
        let l = ledger(&w, u1);
        w.members.invite(u1, l, "b@x.com", MemberRole::Admin).unwrap();
        let owner_row = w.memberships.find_by_user_and_ledger(u1, l).unwrap().unwrap();

        for actor in [u1, u2] {
            let err = w.members.remove(actor, l, owner_row.id).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::BadRequest);
            assert_eq!(err.message(), "Cannot remove OWNER from ledger");
        }
        assert_eq!(owner_count(&w.memberships, l), 1);
    }

    #[test]
    fn invite_rules() {
        let w = world();
        let u1 = signup(&w, "a@x.com");
        signup(&w, "b@x.com");
        let u3 = signup(&w, "c@x.com");
        let l = ledger(&w, u1);

        let err = w.members.invite(u1, l, "nobody@x.com", MemberRole::Member).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = w.members.invite(u1, l, "b@x.com", MemberRole::Owner).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);

        w.members.invite(u1, l, "b@x.com", MemberRole::Viewer).unwrap();
        let err = w.members.invite(u1, l, "B@x.com", MemberRole::Member).unwrap_err();
        assert_eq!(err.message(), "User is already a member of this ledger");

        // A VIEWER cannot invite; a non-member is refused before anything else.
        let viewer = w.memberships.find_by_ledger(l).unwrap()[1].user_id;
        let err = w.members.invite(viewer, l, "c@x.com", MemberRole::Viewer).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        let err = w.members.invite(u3, l, "c@x.com", MemberRole::Viewer).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        assert_eq!(err.message(), "You are not a member of this ledger");
    }

    #[test]
    fn members_may_leave_but_not_remove_others() {
        let w = world();
        let u1 = signup(&w, "a@x.com");
        let u2 = signup(&w, "b@x.com");
        let l = ledger(&w, u1);
        let b = w.members.invite(u1, l, "b@x.com", MemberRole::Member).unwrap();
        signup(&w, "c@x.com");
        let c = w.members.invite(u1, l, "c@x.com", MemberRole::Viewer).unwrap();

        let err = w.members.remove(u2, l, c.id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        w.members.remove(u2, l, b.id).unwrap();
        assert_eq!(w.ledgers.get(u2, l).unwrap_err().kind(), ErrorKind::Forbidden);
        assert_eq!(w.members.list(u1, l).unwrap().len(), 2);
    }

    #[test]
    fn member_ids_are_scoped_to_the_path_ledger() {
        let w = world();
        let u1 = signup(&w, "a@x.com");
        signup(&w, "b@x.com");
        let l1 = ledger(&w, u1);
        let l2 = ledger(&w, u1);
        let b = w.members.invite(u1, l1, "b@x.com", MemberRole::Member).unwrap();

        let err = w.members.update_role(u1, l2, b.id, MemberRole::Viewer).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let err = w.members.remove(u1, l2, b.id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn missing_ledger_is_not_found_and_foreign_ledger_is_forbidden() {
        let w = world();
        let u1 = signup(&w, "a@x.com");
        let u2 = signup(&w, "b@x.com");
        let l = ledger(&w, u1);

        assert_eq!(w.ledgers.get(u2, l).unwrap_err().kind(), ErrorKind::Forbidden);
        assert_eq!(
            w.ledgers.get(u1, LedgerId::new()).unwrap_err().kind(),
            ErrorKind::NotFound
        );

        w.members.invite(u1, l, "b@x.com", MemberRole::Admin).unwrap();
        let err = w.ledgers.delete(u2, l).unwrap_err();
        assert_eq!(err.message(), "Only OWNER can delete ledger");

        w.ledgers.delete(u1, l).unwrap();
        assert_eq!(w.ledgers.get(u1, l).unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(w.ledgers.get(u2, l).unwrap_err().kind(), ErrorKind::NotFound);
        assert!(w.ledgers.list_mine(u1).unwrap().is_empty());
    }

    #[test]
    fn ledger_update_is_admin_and_up() {
        let w = world();
        let u1 = signup(&w, "a@x.com");
        let u2 = signup(&w, "b@x.com");
        let l = ledger(&w, u1);
        let b = w.members.invite(u1, l, "b@x.com", MemberRole::Member).unwrap();

        let rename = || UpdateLedger {
            name: Some("Renamed".into()),
            ..UpdateLedger::default()
        };
        let err = w.ledgers.update(u2, l, rename()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        w.members.update_role(u1, l, b.id, MemberRole::Admin).unwrap();
        let view = w.ledgers.update(u2, l, rename()).unwrap();
        assert_eq!(view.name, "Renamed");
        assert_eq!(view.my_role, MemberRole::Admin);
        assert_eq!(view.member_count, 2);
    }

    // ─────────────────────────────────────────────────────────────
    // Categories
    // ─────────────────────────────────────────────────────────────

    #[test]
    fn category_lifecycle_and_deletion_rules() {
        let w = world();
        let u1 = signup(&w, "a@x.com");
        let u2 = signup(&w, "b@x.com");
        let l = ledger(&w, u1);
        let other = ledger(&w, u2);

        let create = |name: &str| CreateCategory {
            name: name.into(),
            color: None,
            icon: None,
        };

        let defaults = w.categories.list(u1, l).unwrap();
        assert!(defaults.iter().all(|c| c.is_default));

        let pets = w.categories.create(u1, l, create("Pets")).unwrap();
        assert_eq!(pets.color, "#808080");
        assert_eq!(
            w.categories.create(u1, l, create("Pets")).unwrap_err().kind(),
            ErrorKind::BadRequest
        );
        // Same name in a different ledger is fine.
        let foreign = w.categories.create(u2, other, create("Pets")).unwrap();

        let err = w.categories.delete(u1, l, defaults[0].id).unwrap_err();
        assert_eq!(err.message(), "Cannot delete default categories");
        let err = w.categories.delete(u1, l, foreign.id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        let spent = w
            .expenses
            .create(
                u1,
                l,
                CreateExpense {
                    category_id: Some(pets.id),
                    ..expense_input("12.50")
                },
            )
            .unwrap();
        let err = w.categories.delete(u1, l, pets.id).unwrap_err();
        assert_eq!(err.message(), "Cannot delete category that is used by 1 expense(s)");

        w.expenses.delete(u1, l, spent.id).unwrap();
        w.categories.delete(u1, l, pets.id).unwrap();
        assert_eq!(
            w.categories.delete(u1, l, pets.id).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn only_admins_manage_categories() {
        let w = world();
        let u1 = signup(&w, "a@x.com");
        let u2 = signup(&w, "b@x.com");
        let l = ledger(&w, u1);
        w.members.invite(u1, l, "b@x.com", MemberRole::Member).unwrap();

        let err = w
            .categories
            .create(
                u2,
                l,
                CreateCategory {
                    name: "Mine".into(),
                    color: Some("#00ff00".into()),
                    icon: None,
                },
            )
            .unwrap_err();
        assert_eq!(err.message(), "Only OWNER and ADMIN can manage categories");
        // Reading is open to every member.
        assert!(!w.categories.list(u2, l).unwrap().is_empty());
    }

    // ─────────────────────────────────────────────────────────────
    // Expenses
    // ─────────────────────────────────────────────────────────────

    #[test]
    fn expense_permission_matrix() {
        let w = world();
        let owner = signup(&w, "owner@x.com");
        let admin = signup(&w, "admin@x.com");
        let member = signup(&w, "member@x.com");
        let other = signup(&w, "other@x.com");
        let viewer = signup(&w, "viewer@x.com");
        let l = ledger(&w, owner);
        for (email, role) in [
            ("admin@x.com", MemberRole::Admin),
            ("member@x.com", MemberRole::Member),
            ("other@x.com", MemberRole::Member),
            ("viewer@x.com", MemberRole::Viewer),
        ] {
            w.members.invite(owner, l, email, role).unwrap();
        }

        let err = w.expenses.create(viewer, l, expense_input("1")).unwrap_err();
        assert_eq!(err.message(), "VIEWER cannot create expenses");

        let e = w.expenses.create(member, l, expense_input("10.5")).unwrap();
        assert_eq!(e.amount.to_string(), "10.50");
        assert_eq!(e.created_by.id, member);

        let edit = || UpdateExpense {
            description: Some("Dinner".into()),
            ..UpdateExpense::default()
        };
        for denied in [other, viewer] {
            assert_eq!(
                w.expenses.update(denied, l, e.id, edit()).unwrap_err().kind(),
                ErrorKind::Forbidden
            );
            assert_eq!(
                w.expenses.delete(denied, l, e.id).unwrap_err().kind(),
                ErrorKind::Forbidden
            );
        }
        for allowed in [member, admin, owner] {
            let updated = w.expenses.update(allowed, l, e.id, edit()).unwrap();
            assert_eq!(updated.description, "Dinner");
        }

        w.expenses.delete(admin, l, e.id).unwrap();
        assert_eq!(
            w.expenses.get(owner, l, e.id).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn expense_validation_and_category_visibility() {
        let w = world();
        let u1 = signup(&w, "a@x.com");
        let u2 = signup(&w, "b@x.com");
        let l = ledger(&w, u1);
        let other = ledger(&w, u2);

        for bad in ["0", "-3", "1.234", "abc"] {
            let err = w.expenses.create(u1, l, expense_input(bad)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::BadRequest, "amount {bad}");
            assert_eq!(err.field_errors()[0].field, "amount");
        }

        let missing = w.expenses.create(u1, l, CreateExpense::default()).unwrap_err();
        let fields: Vec<_> = missing.field_errors().iter().map(|f| f.field.as_str()).collect();
        assert!(fields.contains(&"amount"));
        assert!(fields.contains(&"description"));
        assert!(fields.contains(&"expense_date"));

        let foreign = w
            .categories
            .create(
                u2,
                other,
                CreateCategory {
                    name: "Private".into(),
                    color: None,
                    icon: None,
                },
            )
            .unwrap();
        let err = w
            .expenses
            .create(
                u1,
                l,
                CreateExpense {
                    category_id: Some(foreign.id),
                    ..expense_input("5")
                },
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let food = w.categories.list(u1, l).unwrap()[0].clone();
        let view = w
            .expenses
            .create(
                u1,
                l,
                CreateExpense {
                    category_id: Some(food.id),
                    ..expense_input("5")
                },
            )
            .unwrap();
        assert_eq!(view.category.map(|c| c.id), Some(food.id));
    }

    #[test]
    fn expense_listing_filters_pages_and_survives_deleted_creators() {
        let w = world();
        let u1 = signup(&w, "a@x.com");
        let u2 = signup(&w, "b@x.com");
        let l = ledger(&w, u1);
        w.members.invite(u1, l, "b@x.com", MemberRole::Member).unwrap();

        for day in 1..=5 {
            let author = if day % 2 == 0 { u2 } else { u1 };
            w.expenses
                .create(
                    author,
                    l,
                    CreateExpense {
                        expense_date: NaiveDate::from_ymd_opt(2024, 5, day),
                        ..expense_input("3")
                    },
                )
                .unwrap();
        }

        let page = w
            .expenses
            .list(u1, l, &ExpenseFilter::default(), PageRequest::new(Some(0), Some(2)))
            .unwrap();
        assert_eq!(page.total_elements, 5);
        assert_eq!(page.total_pages, 3);
        assert!(page.first && !page.last);
        assert_eq!(page.content[0].expense_date, NaiveDate::from_ymd_opt(2024, 5, 5).unwrap());

        let filter = ExpenseFilter {
            start_date: NaiveDate::from_ymd_opt(2024, 5, 2),
            end_date: NaiveDate::from_ymd_opt(2024, 5, 4),
            category_id: None,
        };
        let page = w.expenses.list(u1, l, &filter, PageRequest::default()).unwrap();
        assert_eq!(page.total_elements, 3);

        w.users.delete(u2).unwrap();
        let page = w
            .expenses
            .list(u1, l, &ExpenseFilter::default(), PageRequest::default())
            .unwrap();
        let unknown = page
            .content
            .iter()
            .filter(|e| e.created_by.name == "Unknown")
            .count();
        assert_eq!(unknown, 2);

        // The deleted user's membership row remains but has no profile.
        let members = w.members.list(u1, l).unwrap();
        assert_eq!(members.iter().filter(|m| m.user.is_none()).count(), 1);
        assert!(w.principals.find_by_id(u2).unwrap().is_none());
    }
}
