//! Create/edit form: validation, submission, keyboard shortcuts.

use hashbrown::HashSet;

use crate::{
    character::{Character, CharacterDraft, CharacterPatch},
    core::store::CatalogStore,
    routes::Route,
    types::{CharacterId, CharacterStatus},
};

/// Minimum length of a non-empty name.
pub const NAME_MIN_LEN: usize = 2;

const PREVIEW_PLACEHOLDER: &str = "data:image/svg+xml;utf8,%3Csvg%20xmlns%3D%22http%3A%2F%2Fwww.w3.org%2F2000%2Fsvg%22%20width%3D%22600%22%20height%3D%22600%22%3E%3Crect%20width%3D%22100%25%22%20height%3D%22100%25%22%20fill%3D%22%23151b28%22%2F%3E%3Ctext%20x%3D%2250%25%22%20y%3D%2250%25%22%20dominant-baseline%3D%22middle%22%20text-anchor%3D%22middle%22%20fill%3D%22%238aa0c5%22%20font-family%3D%22sans-serif%22%20font-size%3D%2222%22%3EImage%20preview%3C%2Ftext%3E%3C%2Fsvg%3E";

/// Whether the form creates a record or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    /// New record; the store assigns the id.
    Create,
    /// Edit of the record with this id.
    Edit(CharacterId),
}

/// Editable fields, all required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    /// Display name.
    Name,
    /// Species label.
    Species,
    /// Life status.
    Status,
    /// Portrait URL.
    Image,
}

impl FormField {
    /// Every field, in display order.
    pub const ALL: [FormField; 4] = [
        FormField::Name,
        FormField::Species,
        FormField::Status,
        FormField::Image,
    ];
}

/// One validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// Field is empty.
    Required(FormField),
    /// Field is non-empty but shorter than `min` characters.
    MinLength {
        /// Offending field.
        field: FormField,
        /// Required length.
        min: usize,
    },
}

impl FieldError {
    /// Field the error belongs to.
    pub fn field(&self) -> FormField {
        match self {
            FieldError::Required(field) | FieldError::MinLength { field, .. } => *field,
        }
    }
}

/// Validated result of a submit, ready to be applied to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormSubmission {
    /// Create a record from the draft.
    Create(CharacterDraft),
    /// Patch an existing record.
    Update {
        /// Record being edited.
        id: CharacterId,
        /// Every form field, as a patch.
        patch: CharacterPatch,
    },
}

impl FormSubmission {
    /// Applies the submission and returns the detail route to navigate to,
    /// plus the record the store now holds. An edit of an id that does not
    /// resolve changes nothing and yields `None`.
    pub fn apply(self, store: &mut CatalogStore) -> (Route, Option<Character>) {
        match self {
            FormSubmission::Create(draft) => {
                let created = store.create_local(draft);
                (Route::detail(created.id), Some(created))
            }
            FormSubmission::Update { id, patch } => {
                let updated = store.update_local(id, &patch);
                (Route::detail(id), updated)
            }
        }
    }
}

/// Keys the form reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Enter / Return.
    Enter,
    /// Escape.
    Escape,
    /// Printable character.
    Char(char),
    /// Anything else.
    Other,
}

/// One key press with its modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    /// Pressed key.
    pub key: Key,
    /// Control held.
    pub ctrl: bool,
    /// Command/Meta held.
    pub meta: bool,
}

impl KeyChord {
    /// Key without modifiers.
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            meta: false,
        }
    }

    /// Key with Control held.
    pub fn ctrl(key: Key) -> Self {
        Self {
            key,
            ctrl: true,
            meta: false,
        }
    }

    /// Key with Command/Meta held.
    pub fn meta(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            meta: true,
        }
    }
}

/// Action bound to a keyboard shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    /// Validate and save.
    Submit,
    /// Leave without saving.
    Cancel,
}

/// Ctrl/Cmd+Enter submits, Escape cancels, everything else is ignored.
pub fn shortcut_for(chord: KeyChord) -> Option<FormAction> {
    match chord.key {
        Key::Enter if chord.ctrl || chord.meta => Some(FormAction::Submit),
        Key::Escape => Some(FormAction::Cancel),
        _ => None,
    }
}

/// Form state for creating or editing one record.
#[derive(Debug, Clone)]
pub struct CharacterForm {
    mode: FormMode,
    /// Name input.
    pub name: String,
    /// Species input.
    pub species: String,
    /// Status select; `None` is an unselected value.
    pub status: Option<CharacterStatus>,
    /// Image URL input.
    pub image: String,
    touched: HashSet<FormField>,
}

impl CharacterForm {
    /// Blank create form with status `unknown`.
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            name: String::new(),
            species: String::new(),
            status: Some(CharacterStatus::Unknown),
            image: String::new(),
            touched: HashSet::new(),
        }
    }

    /// Edit form for `id`, prefilled from the store when the record resolves.
    pub fn edit(store: &CatalogStore, id: CharacterId) -> Self {
        let mut form = Self {
            mode: FormMode::Edit(id),
            ..Self::create()
        };
        if let Some(existing) = store.find_by_id(id) {
            form.fill_from(&existing);
        }
        form
    }

    /// Form for a route: edit when an id is present, create otherwise.
    pub fn for_route(store: &CatalogStore, route: &Route) -> Option<Self> {
        match route {
            Route::New => Some(Self::create()),
            Route::Edit(raw) => {
                let id = crate::controller::detail::parse_route_id(raw)?;
                Some(Self::edit(store, id))
            }
            _ => None,
        }
    }

    /// Create or edit.
    pub fn mode(&self) -> FormMode {
        self.mode
    }

    /// Copies every field from `rec`.
    pub fn fill_from(&mut self, rec: &Character) {
        self.name = rec.name.clone();
        self.species = rec.species.clone();
        self.status = Some(rec.status);
        self.image = rec.image.clone();
    }

    /// Marks `field` as interacted with.
    pub fn touch(&mut self, field: FormField) {
        self.touched.insert(field);
    }

    /// Marks every field touched.
    pub fn mark_all_touched(&mut self) {
        self.touched.extend(FormField::ALL);
    }

    /// Returns true once `field` was touched.
    pub fn is_touched(&self, field: FormField) -> bool {
        self.touched.contains(&field)
    }

    /// All current validation failures, touched or not.
    pub fn errors(&self) -> Vec<FieldError> {
        let mut out = Vec::new();
        if self.name.is_empty() {
            out.push(FieldError::Required(FormField::Name));
        } else if self.name.chars().count() < NAME_MIN_LEN {
            out.push(FieldError::MinLength {
                field: FormField::Name,
                min: NAME_MIN_LEN,
            });
        }
        if self.species.is_empty() {
            out.push(FieldError::Required(FormField::Species));
        }
        if self.status.is_none() {
            out.push(FieldError::Required(FormField::Status));
        }
        if self.image.is_empty() {
            out.push(FieldError::Required(FormField::Image));
        }
        out
    }

    /// Returns true when there are no validation errors.
    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    /// Errors worth showing: only those on touched fields.
    pub fn visible_errors(&self) -> Vec<FieldError> {
        self.errors()
            .into_iter()
            .filter(|e| self.is_touched(e.field()))
            .collect()
    }

    /// Validates and builds the submission; on failure every field is marked
    /// touched and nothing else happens.
    pub fn submit(&mut self) -> Result<FormSubmission, Vec<FieldError>> {
        let errors = self.errors();
        if !errors.is_empty() {
            self.mark_all_touched();
            return Err(errors);
        }
        let draft = CharacterDraft {
            name: self.name.clone(),
            status: self.status.unwrap_or_default(),
            species: self.species.clone(),
            image: self.image.clone(),
        };
        Ok(match self.mode {
            FormMode::Create => FormSubmission::Create(draft),
            FormMode::Edit(id) => FormSubmission::Update {
                id,
                patch: draft.into(),
            },
        })
    }

    /// Where cancel leads: the record's detail when editing, the list otherwise.
    pub fn cancel_route(&self) -> Route {
        match self.mode {
            FormMode::Create => Route::List,
            FormMode::Edit(id) => Route::detail(id),
        }
    }

    /// Image URL to preview, or an inline placeholder when blank.
    pub fn image_preview(&self) -> &str {
        let url = self.image.trim();
        if url.is_empty() { PREVIEW_PLACEHOLDER } else { url }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> CharacterForm {
        let mut form = CharacterForm::create();
        form.name = "Rick".to_string();
        form.species = "Human".to_string();
        form.image = "rick.png".to_string();
        form
    }

    #[test]
    fn new_form_defaults_status_to_unknown() {
        let form = CharacterForm::create();
        assert_eq!(form.status, Some(CharacterStatus::Unknown));
        assert_eq!(form.mode(), FormMode::Create);
    }

    #[test]
    fn empty_name_is_required_not_min_length() {
        let mut form = filled();
        form.name.clear();
        assert_eq!(form.errors(), vec![FieldError::Required(FormField::Name)]);

        form.name = "R".to_string();
        assert_eq!(
            form.errors(),
            vec![FieldError::MinLength {
                field: FormField::Name,
                min: NAME_MIN_LEN
            }]
        );
    }

    #[test]
    fn errors_are_hidden_until_touched() {
        let mut form = CharacterForm::create();
        assert!(!form.errors().is_empty());
        assert!(form.visible_errors().is_empty());

        form.touch(FormField::Species);
        assert_eq!(
            form.visible_errors(),
            vec![FieldError::Required(FormField::Species)]
        );
    }

    #[test]
    fn invalid_submit_marks_all_touched() {
        let mut form = CharacterForm::create();
        assert!(form.submit().is_err());
        for field in FormField::ALL {
            assert!(form.is_touched(field));
        }
    }

    #[test]
    fn shortcuts() {
        assert_eq!(shortcut_for(KeyChord::ctrl(Key::Enter)), Some(FormAction::Submit));
        assert_eq!(shortcut_for(KeyChord::meta(Key::Enter)), Some(FormAction::Submit));
        assert_eq!(shortcut_for(KeyChord::plain(Key::Enter)), None);
        assert_eq!(shortcut_for(KeyChord::plain(Key::Escape)), Some(FormAction::Cancel));
        assert_eq!(shortcut_for(KeyChord::ctrl(Key::Char('s'))), None);
    }

    #[test]
    fn preview_falls_back_to_placeholder() {
        let mut form = CharacterForm::create();
        form.image = "   ".to_string();
        assert!(form.image_preview().starts_with("data:image/svg+xml"));
        form.image = " rick.png ".to_string();
        assert_eq!(form.image_preview(), "rick.png");
    }

    #[test]
    fn route_picks_form_mode() {
        let mut store = CatalogStore::new();
        let created = store.create_local(CharacterDraft {
            name: "Birdperson".to_string(),
            status: CharacterStatus::Alive,
            species: "Bird-Person".to_string(),
            image: "bp.png".to_string(),
        });
        assert_eq!(created.id, 1);

        let form = CharacterForm::for_route(&store, &Route::New).expect("new");
        assert_eq!(form.mode(), FormMode::Create);
        assert!(form.name.is_empty());

        let form = CharacterForm::for_route(&store, &Route::Edit("1".into())).expect("edit");
        assert_eq!(form.mode(), FormMode::Edit(1));
        assert_eq!(form.name, "Birdperson");

        let form = CharacterForm::for_route(&store, &Route::Edit("5".into())).expect("edit");
        assert_eq!(form.mode(), FormMode::Edit(5));
        assert!(form.name.is_empty());

        assert!(CharacterForm::for_route(&store, &Route::Edit("abc".into())).is_none());
        assert!(CharacterForm::for_route(&store, &Route::List).is_none());
        assert!(CharacterForm::for_route(&store, &Route::detail(1)).is_none());
    }

    #[test]
    fn edit_of_unknown_id_applies_nothing() {
        let mut store = CatalogStore::new();
        let mut form = CharacterForm::edit(&store, 77);
        form.name = "Ghost".to_string();
        form.species = "Unknown".to_string();
        form.image = "g.png".to_string();

        let (route, changed) = form.submit().expect("valid").apply(&mut store);
        assert_eq!(route, Route::detail(77));
        assert!(changed.is_none());
        assert!(store.overlay().is_empty());
    }

    #[test]
    fn cancel_route_depends_on_mode() {
        let store = CatalogStore::new();
        assert_eq!(CharacterForm::create().cancel_route(), Route::List);
        assert_eq!(CharacterForm::edit(&store, 9).cancel_route(), Route::detail(9));
    }
}
