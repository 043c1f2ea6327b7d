pub use academy_models::classes::Class;
pub use academy_models::parents::ParentDto;
pub use academy_models::registrations::{
    CreateRegistrationDto, INVALID_STATUS_MESSAGE, RegistrationCreated, RegistrationQuery,
    RegistrationRow, RegistrationStatus, RegistrationWithDetails, Student, StudentDto,
    UpdateClassAssignmentDto, UpdateStatusDto,
};
