table! {
    grade_subjects (id) {
        id -> Uuid,
        grade_id -> Uuid,
        subject_id -> Uuid,
        is_active -> Bool,
        created_at -> Timestamp,
    }
}

table! {
    grades (id) {
        id -> Uuid,
        name -> Varchar,
        description -> Nullable<Text>,
        is_active -> Bool,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

table! {
    student_grades (id) {
        id -> Uuid,
        student_id -> Uuid,
        grade_id -> Uuid,
        enrolled_at -> Timestamp,
        is_active -> Bool,
    }
}

table! {
    subjects (id) {
        id -> Uuid,
        name -> Varchar,
        description -> Nullable<Text>,
        is_active -> Bool,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

table! {
    teacher_subjects (id) {
        id -> Uuid,
        teacher_id -> Uuid,
        subject_id -> Uuid,
        is_active -> Bool,
        created_at -> Timestamp,
    }
}

table! {
    users (id) {
        id -> Uuid,
        email -> Text,
        hash_pwd -> Varchar,
        given_name -> Varchar,
        family_name -> Varchar,
        user_role -> Varchar,
        is_active -> Bool,
        joined_at -> Timestamp,
        last_login_at -> Nullable<Timestamp>,
    }
}

joinable!(grade_subjects -> grades (grade_id));
joinable!(grade_subjects -> subjects (subject_id));
joinable!(student_grades -> grades (grade_id));
joinable!(student_grades -> users (student_id));
joinable!(teacher_subjects -> subjects (subject_id));
joinable!(teacher_subjects -> users (teacher_id));

allow_tables_to_appear_in_same_query!(
    grade_subjects,
    grades,
    student_grades,
    subjects,
    teacher_subjects,
    users,
);
